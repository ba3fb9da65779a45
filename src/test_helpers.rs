//! Shared test utilities.
//!
//! Scripted service backends and a config rooted in a temp directory, so
//! article building and full runs can be tested without network access.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = test_config(tmp.path());
//! let text = MockText::replying([Some("## Seção"), None]);
//! let images = MockImage::replying([Some(tiny_png())]);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Cursor;
use std::path::Path;

use crate::config::SiteConfig;
use crate::fallback::ServiceError;
use crate::images::ImageBackend;
use crate::llm::TextBackend;

// =========================================================================
// Config
// =========================================================================

/// Stock config with every path under `root` and a recognizable site URL.
pub fn test_config(root: &Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.site.url = "https://cafe.test".to_string();
    config.paths.output_dir = root.join("public");
    config.paths.cache_dir = root.join("cache");
    config.paths.seeds_file = root.join("keywords.txt");
    config.paths.stylesheet = root.join("styles.css");
    config
}

/// A valid 2×2 PNG.
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([120, 80, 40]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

// =========================================================================
// Scripted backends
// =========================================================================

/// Text backend that plays back scripted replies in order.
///
/// `Some(text)` is returned as the completion, `None` as an HTTP 500. Once
/// the script runs out, every call gets the `always` reply, or a 503.
#[derive(Default)]
pub struct MockText {
    script: RefCell<VecDeque<Option<String>>>,
    always: Option<String>,
    calls: Cell<usize>,
    last_user: RefCell<Option<String>>,
}

impl MockText {
    pub fn replying<'a>(script: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().map(|r| r.map(str::to_string)).collect()),
            ..Self::default()
        }
    }

    /// Every call succeeds with `reply`.
    pub fn always(reply: &str) -> Self {
        Self {
            always: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_user_prompt(&self) -> Option<String> {
        self.last_user.borrow().clone()
    }
}

impl TextBackend for MockText {
    fn complete(&self, _system: &str, user: &str) -> Result<String, ServiceError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_user.borrow_mut() = Some(user.to_string());
        match self.script.borrow_mut().pop_front() {
            Some(Some(reply)) => Ok(reply),
            Some(None) => Err(ServiceError::Status(500)),
            None => self.always.clone().ok_or(ServiceError::Status(503)),
        }
    }
}

/// Image backend that plays back scripted byte payloads in order.
///
/// `None` entries fail with an HTTP 500; an exhausted script fails with 503.
#[derive(Default)]
pub struct MockImage {
    script: RefCell<VecDeque<Option<Vec<u8>>>>,
    calls: Cell<usize>,
}

impl MockImage {
    pub fn replying(script: impl IntoIterator<Item = Option<Vec<u8>>>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().collect()),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ImageBackend for MockImage {
    fn generate(&self, _prompt: &str) -> Result<Vec<u8>, ServiceError> {
        self.calls.set(self.calls.get() + 1);
        match self.script.borrow_mut().pop_front() {
            Some(Some(bytes)) => Ok(bytes),
            Some(None) => Err(ServiceError::Status(500)),
            None => Err(ServiceError::Status(503)),
        }
    }
}
