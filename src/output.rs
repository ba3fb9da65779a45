//! CLI output formatting for a build run.
//!
//! Output is information-first: each published article is shown by its
//! positional index and title, with the written file as secondary context.
//!
//! ```text
//! Posts
//! 001 Aeropress → posts/aeropress/index.html
//!     Cover: assets/aeropress.svg
//! 002 Café gelado → posts/cafe-gelado/index.html
//!
//! Pages
//! 001 Sobre → sobre/index.html
//! 002 Privacidade → privacidade/index.html
//! 003 Afiliados → afiliados/index.html
//!
//! Skipped 1 new article (new-page limit reached)
//! Cache: 1 cached, 0 stored, 1 uncached
//! Generated 2 posts in public (text calls: 0, image calls: 0)
//! ```
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::pages::PAGE_LINKS;
use crate::pipeline::RunReport;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Last path segment of a URL (`…/assets/x.png` → `x.png`).
fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

pub fn format_run_report(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Posts".to_string());
    for (i, post) in report.published.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} posts/{}/index.html",
            format_index(i + 1),
            post.title,
            post.slug
        ));
        if let Some(image) = &post.image {
            lines.push(format!("{}Cover: assets/{}", indent(1), file_name(&image.url)));
        }
    }

    lines.push(String::new());
    lines.push("Pages".to_string());
    for (i, (slug, label)) in PAGE_LINKS.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}/index.html",
            format_index(i + 1),
            label,
            slug
        ));
    }
    lines.push(String::new());

    if report.skipped_new > 0 {
        lines.push(format!(
            "Skipped {} (new-page limit reached)",
            plural(report.skipped_new, "new article")
        ));
    }
    lines.push(format!("Cache: {}", report.cache));
    lines.push(format_summary(report));

    lines
}

/// The closing one-line summary.
pub fn format_summary(report: &RunReport) -> String {
    format!(
        "Generated {} in {} (text calls: {}, image calls: {})",
        plural(report.posts, "post"),
        report.output_dir.display(),
        report.text_calls,
        report.image_calls
    )
}

pub fn print_run_report(report: &RunReport) {
    for line in format_run_report(report) {
        println!("{}", line);
    }
}
