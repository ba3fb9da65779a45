//! # Seedpress
//!
//! A static content-site generator: a list of keyword seeds goes in, and a
//! complete site comes out. Each seed becomes an article page with a title,
//! meta description, body, affiliate calls-to-action, and an optional cover
//! image, and the run also writes an index, informational pages, a sitemap,
//! and `robots.txt`.
//!
//! # Architecture: One Pass, Resilient Generation
//!
//! ```text
//! config (defaults ← seedpress.toml ← env)
//!   → seeds            data/keywords.txt, or a built-in list
//!   → per keyword      title/description, body, CTAs, cover image
//!   → per article      public/posts/<slug>/index.html
//!   → site files       index, static pages, sitemap.xml, robots.txt, styles.css
//! ```
//!
//! Text and images can come from external generation services, but nothing
//! depends on them. Every request sits behind [`fallback::attempt_or`]: a
//! missing credential, an HTTP error, a timeout, or a malformed answer all
//! produce deterministic local content, and the run carries on. A run with no
//! credentials at all still produces a complete, valid site.
//!
//! Two mechanisms keep service use bounded:
//!
//! - **Body cache** ([`cache`]): a body produced by the service is stored per
//!   slug and reused by every later run without a request.
//! - **Run budget** ([`budget`]): at most `llm.max_calls_per_run` body requests
//!   and `images.max_calls_per_run` image requests are attempted per run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Orchestrates a run: seeds, article building, page writing |
//! | [`llm`] | Text service client, title/description and body generation with fallbacks |
//! | [`images`] | Image service client, PNG storage, placeholder SVG covers |
//! | [`fallback`] | The try-once-then-fall-back helper and `ServiceError` |
//! | [`cache`] | Per-slug body cache |
//! | [`budget`] | Per-run caps on external requests |
//! | [`affiliate`] | Keyword classification and marketplace search links |
//! | [`markup`] | Line-based markdown subset to HTML |
//! | [`render`] | Maud templates, sitemap, robots, stylesheet |
//! | [`pages`] | The fixed informational pages |
//! | [`config`] | Layered `seedpress.toml` + environment configuration |
//! | [`types`] | Records passed between stages (`Article`, `CtaLink`, ...) |
//! | [`naming`] | Slugs and text shaping |
//! | [`files`] | Filesystem helpers where absence is not an error |
//! | [`output`] | CLI output formatting for a run report |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Templates are type-checked Rust, interpolation is escaped by
//! default, and there is no template directory to ship.
//!
//! ## Backends Behind Traits
//!
//! The services are reached through [`llm::TextBackend`] and
//! [`images::ImageBackend`]. The pipeline takes `Option<&dyn Backend>`, where
//! `None` means "not configured", so tests drive full runs with scripted
//! backends and no network.
//!
//! ## Nothing Is Invalidated
//!
//! Cache entries and cover images are reused for as long as the files exist.
//! Deleting a file is the way to regenerate it.

pub mod affiliate;
pub mod budget;
pub mod cache;
pub mod config;
pub mod fallback;
pub mod files;
pub mod images;
pub mod llm;
pub mod markup;
pub mod naming;
pub mod output;
pub mod pages;
pub mod pipeline;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
