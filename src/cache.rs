//! Generated-body cache for repeat runs.
//!
//! Text generation is the slow, rate-limited part of a run. Once a body has
//! been produced by the external service it is written to
//! `<cache_dir>/llm/<slug>.md`, and every later run uses that file instead of
//! asking again.
//!
//! # Design
//!
//! - **Keyed by slug.** The slug is derived deterministically from the keyword,
//!   so the same seed always finds its entry.
//! - **Existence is validity.** There is no manifest, hash, or expiry. A file
//!   present for the slug is a hit, and its content is used verbatim. Changing
//!   prompts or outline rules does not invalidate old entries; delete the file
//!   (or the whole directory) to regenerate.
//! - **Only service output is stored.** Fallback bodies are cheap to rebuild
//!   and are never written, so a later run with a credential still gets a real
//!   article.
//! - **A hit costs no budget.** The pipeline consults the cache before the
//!   budget.

use crate::files;
use std::io;
use std::path::{Path, PathBuf};

/// Subdirectory of the cache root holding article bodies.
const BODY_DIR: &str = "llm";

/// Summary of cache use over a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub stores: u32,
    pub misses: u32,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} cached, {} stored, {} uncached",
            self.hits, self.stores, self.misses
        )
    }
}

#[derive(Debug, Clone)]
pub struct BodyCache {
    dir: PathBuf,
}

impl BodyCache {
    /// Cache rooted at `<cache_root>/llm`. Nothing is created until a store.
    pub fn new(cache_root: &Path) -> Self {
        Self {
            dir: cache_root.join(BODY_DIR),
        }
    }

    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.md"))
    }

    /// The cached body for `slug`, if one exists.
    pub fn lookup(&self, slug: &str) -> io::Result<Option<String>> {
        files::read_text(&self.path_for(slug))
    }

    pub fn store(&self, slug: &str, body: &str) -> io::Result<()> {
        files::write_text(&self.path_for(slug), body)
    }
}
