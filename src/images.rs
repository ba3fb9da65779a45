//! Cover images.
//!
//! Every article can carry a 1200×630 cover image, written once to
//! `<output>/assets/<slug>.png` (service-generated) or `<slug>.svg`
//! (locally drawn placeholder) and reused by later runs.
//!
//! ## Resolution order
//!
//! ```text
//! images disabled                    → no image
//! image cap reached                  → no image (no reuse, no placeholder)
//! assets/<slug>.png exists           → reuse   (no request, no budget)
//! assets/<slug>.svg exists           → reuse   (no request, no budget)
//! credential set                     → one request → PNG, or placeholder on failure
//! no credential                      → placeholder SVG
//! ```
//!
//! The cap is checked first: once `images.max_calls_per_run` attempts have
//! been spent, every later article in the run goes without a cover. A cap of
//! 0 therefore means no covers at all.
//!
//! Whatever the service returns (PNG, JPEG, WebP) is decoded and re-encoded as
//! PNG, so the `.png` on disk is always what its extension says.

use crate::budget::Budget;
use crate::config::SiteConfig;
use crate::fallback::{ServiceError, attempt_or};
use crate::files;
use crate::naming::slugify;
use crate::types::CoverImage;
use base64::Engine;
use image::ImageFormat;
use log::{debug, info};
use maud::html;
use serde::{Deserialize, Serialize};
use std::io::{self, Cursor};
use std::path::Path;
use std::time::Duration;

/// Timeout for downloading an image the service hands back as a URL.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// An image generation service returning encoded image bytes.
pub trait ImageBackend {
    fn generate(&self, prompt: &str) -> Result<Vec<u8>, ServiceError>;
}

// ============================================================================
// OpenRouter client
// ============================================================================

#[derive(Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
    b64: Option<String>,
    url: Option<String>,
}

/// Blocking client for an OpenRouter-style image endpoint.
pub struct OpenRouterImages {
    client: reqwest::blocking::Client,
    endpoint: String,
    bearer: String,
    model: String,
    size: String,
    referer: String,
    site_name: String,
}

impl std::fmt::Debug for OpenRouterImages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterImages")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenRouterImages {
    /// `Ok(None)` when images are disabled or no credential is set.
    pub fn from_config(config: &SiteConfig) -> Result<Option<Self>, ServiceError> {
        if !config.images.enabled {
            return Ok(None);
        }
        let Some(key) = config.llm.credential() else {
            return Ok(None);
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.images.timeout_secs))
            .build()?;
        Ok(Some(Self {
            client,
            endpoint: config.images.endpoint.clone(),
            bearer: format!("Bearer {key}"),
            model: config.images.model.clone(),
            size: config.images.size.clone(),
            referer: config.site.url.clone(),
            site_name: config.site.name.clone(),
        }))
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        let resp = self.client.get(url).timeout(DOWNLOAD_TIMEOUT).send()?;
        if !resp.status().is_success() {
            return Err(ServiceError::Status(resp.status().as_u16()));
        }
        Ok(resp.bytes()?.to_vec())
    }
}

impl ImageBackend for OpenRouterImages {
    fn generate(&self, prompt: &str) -> Result<Vec<u8>, ServiceError> {
        let request = ImagesRequest {
            model: &self.model,
            prompt,
            size: &self.size,
            response_format: "b64_json",
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.bearer)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.site_name)
            .json(&request)
            .send()?;
        if !resp.status().is_success() {
            return Err(ServiceError::Status(resp.status().as_u16()));
        }
        let text = resp.text()?;
        match image_payload(&text)? {
            ImagePayload::Inline(bytes) => Ok(bytes),
            ImagePayload::Hosted(url) => self.download(&url),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ImagePayload {
    Inline(Vec<u8>),
    Hosted(String),
}

/// Inline base64 data wins over a hosted URL.
fn image_payload(raw: &str) -> Result<ImagePayload, ServiceError> {
    let parsed: ImagesResponse = serde_json::from_str(raw)?;
    let datum = parsed
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Malformed("no image in response".into()))?;
    if let Some(b64) = datum.b64_json.or(datum.b64).filter(|s| !s.is_empty()) {
        let bytes = base64::engine::general_purpose::STANDARD.decode(b64.trim())?;
        return Ok(ImagePayload::Inline(bytes));
    }
    match datum.url.filter(|u| !u.is_empty()) {
        Some(url) => Ok(ImagePayload::Hosted(url)),
        None => Err(ServiceError::Malformed("image entry has neither data nor url".into())),
    }
}

// ============================================================================
// Cover image resolution
// ============================================================================

fn image_prompt(keyword: &str) -> String {
    format!(
        "Capa minimalista e limpa para artigo sobre '{keyword}'. \
         Estilo fotográfico leve ou ilustração flat; foco em café em casa \
         (equipamentos como cafeteira italiana, prensa francesa, filtros e moedores). \
         Sem texto na imagem, cores neutras, boa legibilidade como thumbnail."
    )
}

/// Produce (or reuse) the cover image for an article.
///
/// Service failures never escape; filesystem errors while writing the
/// placeholder do.
pub fn generate_image(
    config: &SiteConfig,
    backend: Option<&dyn ImageBackend>,
    budget: &mut Budget,
    keyword: &str,
    title: &str,
) -> io::Result<Option<CoverImage>> {
    if !config.images.enabled {
        return Ok(None);
    }
    if budget.images_exhausted() {
        debug!("Image cap reached, no cover for {keyword:?}");
        return Ok(None);
    }
    let slug = slugify(keyword);
    let assets = config.assets_dir();
    let cover = |file: String| CoverImage {
        url: format!("{}/assets/{}", config.site_url(), file),
        alt: format!("Imagem de capa: {title}"),
    };

    for ext in ["png", "svg"] {
        let file = format!("{slug}.{ext}");
        if assets.join(&file).is_file() {
            debug!("Reusing cover image {file}");
            return Ok(Some(cover(file)));
        }
    }

    let png_name = format!("{slug}.png");
    if let Some(backend) = backend
        && budget.try_image()
    {
        let png_path = assets.join(&png_name);
        let stored = attempt_or(
            &format!("cover image for {keyword:?}"),
            || {
                let bytes = backend.generate(&image_prompt(keyword))?;
                store_as_png(&bytes, &png_path)?;
                Ok(true)
            },
            || false,
        );
        if stored {
            info!("Generated cover image {png_name}");
            return Ok(Some(cover(png_name)));
        }
    }

    let svg_name = format!("{slug}.svg");
    files::write_text(&assets.join(&svg_name), &placeholder_svg(title))?;
    info!("Drew placeholder cover {svg_name}");
    Ok(Some(cover(svg_name)))
}

/// Decode any supported format and write it out as PNG.
fn store_as_png(bytes: &[u8], path: &Path) -> Result<(), ServiceError> {
    let decoded = image::load_from_memory(bytes)?;
    let mut encoded = Vec::new();
    decoded.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)?;
    files::write_bytes(path, &encoded)?;
    Ok(())
}

/// 1200×630 two-tone gradient with a stylized moka pot, cup, and grinder,
/// and the title centered on top.
pub fn placeholder_svg(title: &str) -> String {
    // Maud escapes interpolated text, which is all the SVG text node needs.
    let label = html! { (title) }.into_string();
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="630" viewBox="0 0 1200 630">
  <defs>
    <linearGradient id="g" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0%" stop-color="#0f141b"/>
      <stop offset="100%" stop-color="#1a2230"/>
    </linearGradient>
  </defs>
  <rect width="100%" height="100%" fill="url(#g)"/>
  <circle cx="250" cy="330" r="140" fill="#2a3547"/>
  <rect x="400" y="250" width="380" height="200" rx="16" fill="#2a3547"/>
  <circle cx="880" cy="320" r="110" fill="#243040"/>
  <text x="600" y="360" font-size="44" text-anchor="middle" fill="#e6e8eb" font-family="Inter, sans-serif">{label}</text>
</svg>
"##
    )
}
