//! The build run: seeds in, static site out.
//!
//! ```text
//! seeds file ─► load_seeds ─► for each keyword (capped)
//!                               ├─ title + description   (llm, unbudgeted)
//!                               ├─ body: cache ▸ budget ▸ llm ▸ fallback
//!                               ├─ CTA links             (affiliate)
//!                               ├─ cover image           (images, budgeted)
//!                               └─ posts/<slug>/index.html
//!             then index.html, static pages, sitemap.xml, robots.txt, styles.css
//! ```
//!
//! ## Caps
//!
//! | cap                            | effect                                          |
//! |--------------------------------|-------------------------------------------------|
//! | `limits.max_posts_total`       | seeds beyond it are ignored                     |
//! | `limits.max_new_pages_per_run` | articles without a page yet, beyond it, skipped |
//! | `llm.max_calls_per_run`        | later bodies use the fallback                   |
//! | `images.max_calls_per_run`     | once reached, later articles get no cover       |
//! | `--max-posts N`                | stop after N rendered articles                  |
//!
//! The new-page cap and `--max-posts` are off unless set: 0 means no limit.
//!
//! Keywords that slugify to the same slug are one article: the later keyword
//! overwrites the page and replaces the earlier one in the index.

use crate::affiliate::render_cta_links;
use crate::budget::Budget;
use crate::cache::{BodyCache, CacheStats};
use crate::config::{ConfigError, SiteConfig};
use crate::files;
use crate::images::{ImageBackend, generate_image};
use crate::llm::{Origin, TextBackend, fallback_body, gen_article_body, gen_title_and_description};
use crate::naming::slugify;
use crate::pages::static_pages;
use crate::render::{self, RenderContext};
use crate::types::{Article, ArticleSummary};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Seeds used when the seeds file does not exist.
pub const DEFAULT_SEEDS: [&str; 10] = [
    "como fazer café coado",
    "moedor de café para iniciantes",
    "melhor cafeteira italiana",
    "como usar prensa francesa",
    "proporção café e água",
    "moagem para aeropress",
    "café gelado em casa",
    "balança para café",
    "filtro de papel vs metal",
    "como armazenar café em grãos",
];

const BASE_OUTLINE: [&str; 4] = [
    "Materiais e itens necessários",
    "Passo a passo simplificado",
    "Erros comuns e como evitar",
    "Ajustes finos e variações",
];

/// Extra sections, applied in order; each matching rule inserts at index 1.
const OUTLINE_RULES: [(&[&str], &str); 3] = [
    (&["moedor", "moagem"], "Tipos de moedores e moagens"),
    (&["cafeteira", "método", "metodo"], "Como funciona o método"),
    (&["proporção", "proporcao"], "Entendendo proporções e receitas"),
];

/// One keyword per line. Blank lines and `#` comments are skipped; a missing
/// file yields [`DEFAULT_SEEDS`].
pub fn load_seeds(path: &Path) -> io::Result<Vec<String>> {
    let Some(content) = files::read_text(path)? else {
        info!(
            "No seeds file at {}, using {} built-in keywords",
            path.display(),
            DEFAULT_SEEDS.len()
        );
        return Ok(DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect());
    };
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

pub fn outline_from_keyword(keyword: &str) -> Vec<String> {
    let lowered = keyword.to_lowercase();
    let mut outline: Vec<String> = BASE_OUTLINE.iter().map(|s| s.to_string()).collect();
    for (needles, section) in OUTLINE_RULES {
        if needles.iter().any(|n| lowered.contains(n)) {
            outline.insert(1, section.to_string());
        }
    }
    outline
}

/// Everything a run reads but never changes.
pub struct Context<'a> {
    pub config: &'a SiteConfig,
    pub text: Option<&'a dyn TextBackend>,
    pub images: Option<&'a dyn ImageBackend>,
    pub cache: BodyCache,
}

impl<'a> Context<'a> {
    pub fn new(
        config: &'a SiteConfig,
        text: Option<&'a dyn TextBackend>,
        images: Option<&'a dyn ImageBackend>,
    ) -> Self {
        Self {
            config,
            text,
            images,
            cache: BodyCache::new(&config.paths.cache_dir),
        }
    }
}

/// Resolve the body: cache first, then one budgeted request, then fallback.
fn resolve_body(
    ctx: &Context,
    budget: &mut Budget,
    stats: &mut CacheStats,
    keyword: &str,
    slug: &str,
    outline: &[String],
) -> io::Result<String> {
    if let Some(cached) = ctx.cache.lookup(slug)? {
        debug!("Body cache hit for {slug}");
        stats.hits += 1;
        return Ok(cached);
    }
    if let Some(backend) = ctx.text {
        if budget.try_text() {
            let body = gen_article_body(Some(backend), keyword, outline);
            if body.origin == Origin::Service && !body.text.trim().is_empty() {
                ctx.cache.store(slug, &body.text)?;
                stats.stores += 1;
                return Ok(body.text);
            }
            stats.misses += 1;
            return Ok(body.text);
        }
        debug!("Text budget exhausted, fallback body for {slug}");
    }
    stats.misses += 1;
    Ok(fallback_body(keyword, outline))
}

/// Assemble one article. Service failures degrade to local content; only
/// filesystem errors are returned.
pub fn build_article(
    ctx: &Context,
    budget: &mut Budget,
    stats: &mut CacheStats,
    keyword: &str,
    date: &str,
) -> io::Result<Article> {
    let config = ctx.config;
    let slug = slugify(keyword);
    let (title, description) = gen_title_and_description(ctx.text, keyword);
    let outline = outline_from_keyword(keyword);
    let body = resolve_body(ctx, budget, stats, keyword, &slug, &outline)?;
    let ctas = render_cta_links(keyword, &config.affiliate);
    let image = generate_image(config, ctx.images, budget, keyword, &title)?;

    Ok(Article {
        url: format!("{}/posts/{}/", config.site_url(), slug),
        slug,
        title,
        description,
        keyword: keyword.to_string(),
        date: date.to_string(),
        body,
        ctas,
        image,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Stop after this many rendered articles (`--max-posts`). `Some(0)`
    /// is the same as `None`.
    pub max_renders: Option<usize>,
    /// Creation date of new articles and sitemap `lastmod`.
    pub now: DateTime<Utc>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_renders: None,
            now: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    /// Article pages rendered this run.
    pub posts: usize,
    /// Articles without a page that were skipped by the new-page cap.
    pub skipped_new: usize,
    /// Index entries, sorted by slug.
    pub published: Vec<ArticleSummary>,
    pub text_calls: u32,
    pub image_calls: u32,
    pub cache: CacheStats,
    pub output_dir: PathBuf,
}

/// Build the whole site into `paths.output_dir`.
pub fn run(ctx: &Context, options: &RunOptions) -> Result<RunReport, BuildError> {
    let config = ctx.config;
    config.validate()?;
    let out = &config.paths.output_dir;

    let mut seeds = load_seeds(&config.paths.seeds_file)?;
    seeds.truncate(config.limits.max_posts_total);
    info!("Building {} keyword(s) into {}", seeds.len(), out.display());

    let render_ctx = RenderContext::from_config(config);
    let mut budget = Budget::new(config.llm.max_calls_per_run, config.images.max_calls_per_run);
    let mut stats = CacheStats::default();
    let date = options.now.format("%Y-%m-%d").to_string();

    let max_renders = options.max_renders.filter(|&n| n > 0);
    let new_page_cap = Some(config.limits.max_new_pages_per_run).filter(|&n| n > 0);

    let mut posts: BTreeMap<String, ArticleSummary> = BTreeMap::new();
    let mut rendered = 0;
    let mut new_pages = 0;
    let mut skipped_new = 0;

    for keyword in &seeds {
        if max_renders.is_some_and(|max| rendered >= max) {
            info!("Stopping after {rendered} article(s)");
            break;
        }
        let slug = slugify(keyword);
        if slug.is_empty() {
            warn!("Skipping keyword {keyword:?}: no usable characters for a slug");
            continue;
        }
        let is_new = !render::article_path(out, &slug).exists();
        if is_new && new_page_cap.is_some_and(|cap| new_pages >= cap) {
            info!("New-page limit reached, skipping {keyword:?}");
            skipped_new += 1;
            continue;
        }

        let article = build_article(ctx, &mut budget, &mut stats, keyword, &date)?;
        render::write_article(out, &render_ctx, &article)?;
        info!("Generated posts/{slug}/index.html");
        if is_new {
            new_pages += 1;
        }
        rendered += 1;
        posts.insert(slug, article.summary());
    }

    let summaries: Vec<ArticleSummary> = posts.into_values().collect();
    render::write_index(out, &render_ctx, &summaries)?;
    info!("Generated index.html with {} article(s)", summaries.len());

    let pages = static_pages(config);
    for page in &pages {
        render::write_page(out, &render_ctx, page)?;
        info!("Generated {}/index.html", page.slug);
    }

    let site_url = config.site_url();
    let urls: Vec<String> = std::iter::once(format!("{site_url}/"))
        .chain(summaries.iter().map(|p| p.url.clone()))
        .chain(pages.iter().map(|p| format!("{site_url}/{}/", p.slug)))
        .collect();
    render::write_sitemap(out, &urls, options.now)?;
    render::write_robots(out, site_url)?;
    if render::write_stylesheet(out, &config.paths.stylesheet)? {
        debug!("Copied stylesheet from {}", config.paths.stylesheet.display());
    }
    info!("Wrote sitemap.xml ({} URLs), robots.txt, styles.css", urls.len());

    Ok(RunReport {
        posts: rendered,
        skipped_new,
        published: summaries,
        text_calls: budget.text_used(),
        image_calls: budget.images_used(),
        cache: stats,
        output_dir: out.clone(),
    })
}
