//! Records passed between the generator, the pipeline, and the renderer.
//!
//! An [`Article`] is built once per keyword per run and never mutated after it
//! is rendered. Only its rendered HTML and, for the body, its cache file
//! outlive the run.

/// An outbound affiliate link shown on an article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtaLink {
    pub label: String,
    pub url: String,
}

/// A cover image written under the assets directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    /// Absolute URL (`<site_url>/assets/<slug>.png|svg`).
    pub url: String,
    pub alt: String,
}

/// A fully assembled article, ready to render.
#[derive(Debug, Clone)]
pub struct Article {
    pub slug: String,
    /// Canonical URL: `<site_url>/posts/<slug>/`.
    pub url: String,
    pub title: String,
    pub description: String,
    /// The seed this article was generated from.
    pub keyword: String,
    /// Creation date, `YYYY-MM-DD`.
    pub date: String,
    /// Markdown-like body (cached or generated).
    pub body: String,
    pub ctas: Vec<CtaLink>,
    pub image: Option<CoverImage>,
}

impl Article {
    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            slug: self.slug.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
            image: self.image.clone(),
        }
    }
}

/// What the index page and sitemap need to know about an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSummary {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub image: Option<CoverImage>,
}

/// An informational page authored inline (about, privacy, disclosure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPage {
    /// Output directory name: the page lives at `/<slug>/`.
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Trusted HTML, emitted without escaping.
    pub body_html: String,
}
