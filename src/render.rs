//! HTML, sitemap, and robots rendering.
//!
//! Pages are built with [maud](https://maud.lambda.xyz/) templates, so every
//! interpolated string is escaped. The only pre-escaped inputs are the article
//! body (already escaped by [`markdown_to_html`]) and static page bodies,
//! which are authored in this crate.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── index.html                 # Article list
//! ├── posts/<slug>/index.html    # One per article
//! ├── sobre/index.html           # Static pages
//! ├── privacidade/index.html
//! ├── afiliados/index.html
//! ├── assets/<slug>.png|svg      # Cover images
//! ├── sitemap.xml
//! ├── robots.txt
//! └── styles.css
//! ```
//!
//! ## Links
//!
//! Internal links are root-relative and prefixed with the base path, the path
//! component of `site.url` (`/` for `https://example.com`, `/blog/` for
//! `https://user.github.io/blog`), so the site works under a sub-path.
//! Canonical, Open Graph, and sitemap URLs are absolute.

use crate::config::SiteConfig;
use crate::files;
use crate::markup::markdown_to_html;
use crate::pages::PAGE_LINKS;
use crate::types::{Article, ArticleSummary, CoverImage, StaticPage};
use chrono::{DateTime, SecondsFormat, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::io;
use std::path::{Path, PathBuf};

/// Stylesheet written when no custom one is configured.
pub const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

/// Site-wide values every template needs.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub site_name: String,
    pub tagline: String,
    /// Absolute site URL without trailing slash.
    pub site_url: String,
    pub language: String,
    /// Path prefix for internal links; always starts and ends with `/`.
    pub base_path: String,
    pub ga_measurement_id: Option<String>,
}

impl RenderContext {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            site_name: config.site.name.clone(),
            tagline: config.site.tagline.clone(),
            site_url: config.site_url().to_string(),
            language: config.site.language.clone(),
            base_path: base_path(&config.site.url),
            ga_measurement_id: config
                .analytics
                .ga_measurement_id
                .as_deref()
                .map(str::trim)
                .filter(|id| is_measurement_id(id))
                .map(str::to_string),
        }
    }

    /// Root-relative link to `path` (no leading slash) under the base path.
    pub fn link(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }

    /// `og:locale` form of the language tag (`pt-BR` → `pt_BR`).
    fn locale(&self) -> String {
        self.language.replace('-', "_")
    }
}

fn base_path(site_url: &str) -> String {
    let path = url::Url::parse(site_url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();
    let mut path = if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    };
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}

/// Measurement ids end up inside a `<script>`, so only `[A-Za-z0-9-]` passes.
fn is_measurement_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

// ============================================================================
// HTML Components
// ============================================================================

/// Per-page head metadata.
struct PageMeta<'a> {
    title: &'a str,
    description: &'a str,
    canonical: &'a str,
    /// `og:type`: `website` or `article`.
    og_type: &'static str,
    image: Option<&'a CoverImage>,
}

fn base_document(ctx: &RenderContext, meta: &PageMeta, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(ctx.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (meta.title) }
                meta name="description" content=(meta.description);
                link rel="canonical" href=(meta.canonical);
                meta property="og:site_name" content=(ctx.site_name);
                meta property="og:locale" content=(ctx.locale());
                meta property="og:type" content=(meta.og_type);
                meta property="og:title" content=(meta.title);
                meta property="og:description" content=(meta.description);
                meta property="og:url" content=(meta.canonical);
                @if let Some(image) = meta.image {
                    meta property="og:image" content=(image.url);
                    meta property="og:image:alt" content=(image.alt);
                }
                link rel="stylesheet" href=(ctx.link("styles.css"));
                @if let Some(id) = &ctx.ga_measurement_id {
                    (analytics_snippet(id))
                }
            }
            body {
                (site_header(ctx))
                main { (content) }
                (site_footer(ctx))
            }
        }
    }
}

fn analytics_snippet(id: &str) -> Markup {
    let init = format!(
        "window.dataLayer = window.dataLayer || [];\
         function gtag(){{dataLayer.push(arguments);}}\
         gtag('js', new Date());\
         gtag('config', '{id}');"
    );
    html! {
        script async src={ "https://www.googletagmanager.com/gtag/js?id=" (id) } {}
        script { (PreEscaped(init)) }
    }
}

fn site_header(ctx: &RenderContext) -> Markup {
    html! {
        header.site-header {
            a.site-name href=(ctx.base_path) { (ctx.site_name) }
            p.tagline { (ctx.tagline) }
        }
    }
}

fn site_footer(ctx: &RenderContext) -> Markup {
    html! {
        footer.site-footer {
            nav {
                @for (slug, label) in PAGE_LINKS {
                    a href=(ctx.link(&format!("{slug}/"))) { (label) }
                }
            }
            p { "© " (ctx.site_name) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

pub fn render_article(ctx: &RenderContext, article: &Article) -> String {
    let title = format!("{} | {}", article.title, ctx.site_name);
    let meta = PageMeta {
        title: &title,
        description: &article.description,
        canonical: &article.url,
        og_type: "article",
        image: article.image.as_ref(),
    };
    let body_html = markdown_to_html(&article.body);
    let content = html! {
        article.post {
            h1 { (article.title) }
            p.post-meta { time datetime=(article.date) { (article.date) } }
            @if let Some(image) = &article.image {
                figure.cover {
                    img src=(image.url) alt=(image.alt) width="1200" height="630";
                }
            }
            div.post-body { (PreEscaped(body_html)) }
            @if !article.ctas.is_empty() {
                section.cta {
                    h2 { "Produtos recomendados" }
                    ul {
                        @for cta in &article.ctas {
                            li {
                                a href=(cta.url) rel="nofollow sponsored noopener" target="_blank" {
                                    (cta.label)
                                }
                            }
                        }
                    }
                    p.disclosure {
                        "Este conteúdo contém links de afiliados. Podemos receber uma comissão "
                        "pelas compras qualificadas, sem custo extra para você. "
                        a href=(ctx.link("afiliados/")) { "Saiba mais" }
                    }
                }
            }
        }
    };
    base_document(ctx, &meta, content).into_string()
}

/// Home page listing `posts` in the given order.
pub fn render_index(ctx: &RenderContext, posts: &[ArticleSummary]) -> String {
    let title = format!("{} | {}", ctx.site_name, ctx.tagline);
    let canonical = format!("{}/", ctx.site_url);
    let meta = PageMeta {
        title: &title,
        description: &ctx.tagline,
        canonical: &canonical,
        og_type: "website",
        image: None,
    };
    let content = html! {
        section.post-list {
            h1 { "Artigos" }
            @if posts.is_empty() {
                p.empty { "Nenhum artigo publicado ainda." }
            }
            @for post in posts {
                article.post-card {
                    @if let Some(image) = &post.image {
                        a href=(ctx.link(&format!("posts/{}/", post.slug))) {
                            img src=(image.url) alt=(image.alt) loading="lazy";
                        }
                    }
                    h2 {
                        a href=(ctx.link(&format!("posts/{}/", post.slug))) { (post.title) }
                    }
                    p { (post.description) }
                    time datetime=(post.date) { (post.date) }
                }
            }
        }
    };
    base_document(ctx, &meta, content).into_string()
}

pub fn render_page(ctx: &RenderContext, page: &StaticPage) -> String {
    let title = format!("{} | {}", page.title, ctx.site_name);
    let canonical = format!("{}/{}/", ctx.site_url, page.slug);
    let meta = PageMeta {
        title: &title,
        description: &page.description,
        canonical: &canonical,
        og_type: "website",
        image: None,
    };
    let content = html! {
        article.page {
            h1 { (page.title) }
            (PreEscaped(&page.body_html))
        }
    };
    base_document(ctx, &meta, content).into_string()
}

/// XML sitemap with every URL stamped `now` as its last modification.
pub fn render_sitemap(urls: &[String], now: DateTime<Utc>) -> String {
    let lastmod = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let markup = html! {
        (PreEscaped(r#"<?xml version="1.0" encoding="UTF-8"?>"#))
        "\n"
        urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" {
            @for page in urls {
                url {
                    loc { (page) }
                    lastmod { (lastmod) }
                }
            }
        }
    };
    let mut xml = markup.into_string();
    xml.push('\n');
    xml
}

pub fn render_robots(site_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
        site_url.trim_end_matches('/')
    )
}

// ============================================================================
// Writers
// ============================================================================

/// `<out>/posts/<slug>/index.html`
pub fn article_path(out_dir: &Path, slug: &str) -> PathBuf {
    out_dir.join("posts").join(slug).join("index.html")
}

pub fn write_article(out_dir: &Path, ctx: &RenderContext, article: &Article) -> io::Result<PathBuf> {
    let path = article_path(out_dir, &article.slug);
    files::write_text(&path, &render_article(ctx, article))?;
    Ok(path)
}

pub fn write_index(
    out_dir: &Path,
    ctx: &RenderContext,
    posts: &[ArticleSummary],
) -> io::Result<PathBuf> {
    let path = out_dir.join("index.html");
    files::write_text(&path, &render_index(ctx, posts))?;
    Ok(path)
}

pub fn write_page(out_dir: &Path, ctx: &RenderContext, page: &StaticPage) -> io::Result<PathBuf> {
    let path = out_dir.join(&page.slug).join("index.html");
    files::write_text(&path, &render_page(ctx, page))?;
    Ok(path)
}

pub fn write_sitemap(out_dir: &Path, urls: &[String], now: DateTime<Utc>) -> io::Result<PathBuf> {
    let path = out_dir.join("sitemap.xml");
    files::write_text(&path, &render_sitemap(urls, now))?;
    Ok(path)
}

pub fn write_robots(out_dir: &Path, site_url: &str) -> io::Result<PathBuf> {
    let path = out_dir.join("robots.txt");
    files::write_text(&path, &render_robots(site_url))?;
    Ok(path)
}

/// Copy the configured stylesheet, or write the built-in one if it is
/// missing. Returns whether the configured file was used.
pub fn write_stylesheet(out_dir: &Path, configured: &Path) -> io::Result<bool> {
    let dst = out_dir.join("styles.css");
    if files::copy_if_present(configured, &dst)? {
        return Ok(true);
    }
    files::write_text(&dst, DEFAULT_STYLESHEET)?;
    Ok(false)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CtaLink;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn ctx_for(url: &str) -> RenderContext {
        let mut config = SiteConfig::default();
        config.site.url = url.to_string();
        RenderContext::from_config(&config)
    }

    fn sample_article() -> Article {
        Article {
            slug: "cafe-gelado".to_string(),
            url: "https://example.com/posts/cafe-gelado/".to_string(),
            title: "Café gelado em casa".to_string(),
            description: "Receita simples.".to_string(),
            keyword: "café gelado".to_string(),
            date: "2026-10-16".to_string(),
            body: "## Materiais\n- gelo\n- café".to_string(),
            ctas: vec![CtaLink {
                label: "Ver opções de cafeteira".to_string(),
                url: "https://www.amazon.com.br/s?k=cafeteira&tag=x-20&i=kitchen".to_string(),
            }],
            image: Some(CoverImage {
                url: "https://example.com/assets/cafe-gelado.svg".to_string(),
                alt: "Imagem de capa: Café gelado em casa".to_string(),
            }),
        }
    }

    #[test]
    fn base_path_from_site_url() {
        assert_eq!(ctx_for("https://example.com").base_path, "/");
        assert_eq!(ctx_for("https://example.com/").base_path, "/");
        assert_eq!(ctx_for("https://user.github.io/blog").base_path, "/blog/");
        assert_eq!(ctx_for("https://user.github.io/blog/").base_path, "/blog/");
    }

    #[test]
    fn sub_path_prefixes_internal_links() {
        let ctx = ctx_for("https://user.github.io/blog");
        let html = render_index(&ctx, &[sample_article().summary()]);
        assert!(html.contains(r#"href="/blog/styles.css""#));
        assert!(html.contains(r#"href="/blog/posts/cafe-gelado/""#));
        assert!(html.contains(r#"href="/blog/sobre/""#));
        assert!(html.contains(r#"<link rel="canonical" href="https://user.github.io/blog/">"#));
    }

    #[test]
    fn article_page_contents() {
        let ctx = ctx_for("https://example.com");
        let html = render_article(&ctx, &sample_article());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="pt-BR">"#));
        assert!(html.contains("<title>Café gelado em casa | Cafeiro</title>"));
        assert!(html.contains(r#"<meta name="description" content="Receita simples.">"#));
        assert!(html.contains(r#"href="https://example.com/posts/cafe-gelado/""#));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains(r#"<meta property="og:locale" content="pt_BR">"#));
        assert!(html.contains(r#"content="https://example.com/assets/cafe-gelado.svg""#));
        assert!(html.contains("<h2>Materiais</h2>"));
        assert!(html.contains("<ul>\n<li>gelo</li>"));
        assert!(html.contains(r#"rel="nofollow sponsored noopener""#));
        assert!(html.contains("&amp;tag=x-20"));
        assert!(html.contains("links de afiliados"));
        assert!(html.contains(r#"<time datetime="2026-10-16">"#));
    }

    #[test]
    fn article_without_ctas_or_image() {
        let ctx = ctx_for("https://example.com");
        let mut article = sample_article();
        article.ctas.clear();
        article.image = None;
        let html = render_article(&ctx, &article);
        assert!(!html.contains("sponsored"));
        assert!(!html.contains("og:image"));
        assert!(!html.contains("<figure"));
    }

    #[test]
    fn titles_are_escaped() {
        let ctx = ctx_for("https://example.com");
        let mut article = sample_article();
        article.title = "<script>alert('x')</script>".to_string();
        let html = render_article(&ctx, &article);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn analytics_snippet_only_with_valid_id() {
        let mut config = SiteConfig::default();
        let html = render_index(&RenderContext::from_config(&config), &[]);
        assert!(!html.contains("googletagmanager"));

        config.analytics.ga_measurement_id = Some("G-ABC123".to_string());
        let html = render_index(&RenderContext::from_config(&config), &[]);
        assert!(html.contains("gtag/js?id=G-ABC123"));
        assert!(html.contains("gtag('config', 'G-ABC123');"));

        config.analytics.ga_measurement_id = Some("G-1');alert('x".to_string());
        assert!(RenderContext::from_config(&config).ga_measurement_id.is_none());
    }

    #[test]
    fn index_lists_posts_and_footer() {
        let ctx = ctx_for("https://example.com");
        let html = render_index(&ctx, &[sample_article().summary()]);
        assert!(html.contains("Café gelado em casa"));
        assert!(html.contains("Receita simples."));
        for (slug, label) in PAGE_LINKS {
            assert!(html.contains(&format!(r#"<a href="/{slug}/">{label}</a>"#)));
        }
    }

    #[test]
    fn empty_index_says_so() {
        let html = render_index(&ctx_for("https://example.com"), &[]);
        assert!(html.contains("Nenhum artigo"));
    }

    #[test]
    fn static_page_body_is_not_escaped() {
        let ctx = ctx_for("https://example.com");
        let page = StaticPage {
            slug: "sobre".to_string(),
            title: "Sobre".to_string(),
            description: "Quem somos.".to_string(),
            body_html: "<p>Olá <em>mundo</em></p>".to_string(),
        };
        let html = render_page(&ctx, &page);
        assert!(html.contains("<p>Olá <em>mundo</em></p>"));
        assert!(html.contains(r#"href="https://example.com/sobre/""#));
    }

    #[test]
    fn sitemap_lists_every_url() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let urls = vec![
            "https://example.com/".to_string(),
            "https://example.com/posts/a&b/".to_string(),
        ];
        let xml = render_sitemap(&urls, now);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert_eq!(xml.matches("<loc>").count(), 2);
        assert!(xml.contains("<loc>https://example.com/posts/a&amp;b/</loc>"));
        assert!(xml.contains("<lastmod>2026-10-16T12:00:00Z</lastmod>"));
    }

    #[test]
    fn robots_points_at_sitemap() {
        assert_eq!(
            render_robots("https://example.com/"),
            "User-agent: *\nAllow: /\nSitemap: https://example.com/sitemap.xml\n"
        );
    }

    #[test]
    fn writers_create_nested_index_files() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx_for("https://example.com");
        let path = write_article(tmp.path(), &ctx, &sample_article()).unwrap();
        assert_eq!(path, article_path(tmp.path(), "cafe-gelado"));
        assert!(path.is_file());
    }

    #[test]
    fn stylesheet_prefers_configured_file() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("public");
        let custom = tmp.path().join("custom.css");

        assert!(!write_stylesheet(&out, &custom).unwrap());
        let written = std::fs::read_to_string(out.join("styles.css")).unwrap();
        assert_eq!(written, DEFAULT_STYLESHEET);

        std::fs::write(&custom, "body { color: red; }").unwrap();
        assert!(write_stylesheet(&out, &custom).unwrap());
        let written = std::fs::read_to_string(out.join("styles.css")).unwrap();
        assert_eq!(written, "body { color: red; }");
    }
}
