//! Minimal markdown-to-HTML conversion for article bodies.
//!
//! Bodies come from the text service or the local fallback and only use a
//! small subset of markdown, so this is a line-based converter rather than a
//! full parser:
//!
//! | line (trimmed)        | output                     |
//! |-----------------------|----------------------------|
//! | `# x` / `## x` / `### x` | `<h1>x</h1>` / `<h2>` / `<h3>` |
//! | `- x` or `* x`        | `<li>x</li>` inside a `<ul>` |
//! | empty                 | empty line                 |
//! | anything else         | `<p>x</p>`                 |
//!
//! Consecutive list lines share one `<ul>`, closed before the next non-list
//! line or at the end. All text is HTML-escaped; inline markdown such as
//! `**bold**` is left as literal text.

use maud::{Markup, html};

enum Line<'a> {
    Heading(u8, &'a str),
    Item(&'a str),
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return Line::Item(item);
    }
    for (level, prefix) in [(3, "### "), (2, "## "), (1, "# ")] {
        if let Some(text) = trimmed.strip_prefix(prefix) {
            return Line::Heading(level, text.trim());
        }
    }
    Line::Text(trimmed)
}

fn heading(level: u8, text: &str) -> Markup {
    match level {
        1 => html! { h1 { (text) } },
        2 => html! { h2 { (text) } },
        _ => html! { h3 { (text) } },
    }
}

/// Convert a markdown-like body to an HTML fragment, one output line per
/// input line (plus `<ul>`/`</ul>` lines around lists).
pub fn markdown_to_html(body: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_list = false;

    for line in body.lines() {
        let line = classify(line);
        if !matches!(line, Line::Item(_)) && in_list {
            out.push("</ul>".to_string());
            in_list = false;
        }
        match line {
            Line::Item(text) => {
                if !in_list {
                    out.push("<ul>".to_string());
                    in_list = true;
                }
                out.push(html! { li { (text) } }.into_string());
            }
            Line::Heading(level, text) => out.push(heading(level, text).into_string()),
            Line::Blank => out.push(String::new()),
            Line::Text(text) => out.push(html! { p { (text) } }.into_string()),
        }
    }
    if in_list {
        out.push("</ul>".to_string());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_by_level() {
        assert_eq!(markdown_to_html("## Title"), "<h2>Title</h2>");
        assert_eq!(markdown_to_html("# Top"), "<h1>Top</h1>");
        assert_eq!(markdown_to_html("### Resumo prático"), "<h3>Resumo prático</h3>");
    }

    #[test]
    fn consecutive_items_share_one_list() {
        let html = markdown_to_html("- um\n- dois\nDepois");
        assert_eq!(html, "<ul>\n<li>um</li>\n<li>dois</li>\n</ul>\n<p>Depois</p>");
    }

    #[test]
    fn list_closed_at_end_of_input() {
        assert_eq!(markdown_to_html("* a\n* b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
    }

    #[test]
    fn blank_line_closes_list_and_is_kept() {
        let html = markdown_to_html("- a\n\n- b");
        assert_eq!(html, "<ul>\n<li>a</li>\n</ul>\n\n<ul>\n<li>b</li>\n</ul>");
    }

    #[test]
    fn indented_items_are_list_items() {
        assert_eq!(markdown_to_html("   - recuado"), "<ul>\n<li>recuado</li>\n</ul>");
    }

    #[test]
    fn plain_lines_become_paragraphs() {
        assert_eq!(markdown_to_html("Olá\nMundo"), "<p>Olá</p>\n<p>Mundo</p>");
    }

    #[test]
    fn text_is_escaped() {
        let html = markdown_to_html("## A & B\n<script>x</script>\n- 1 < 2");
        assert!(html.contains("<h2>A &amp; B</h2>"));
        assert!(html.contains("<p>&lt;script&gt;x&lt;/script&gt;</p>"));
        assert!(html.contains("<li>1 &lt; 2</li>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn hash_without_space_is_text() {
        assert_eq!(markdown_to_html("#hashtag"), "<p>#hashtag</p>");
    }

    #[test]
    fn empty_body_is_empty() {
        assert_eq!(markdown_to_html(""), "");
    }
}
