//! Keyword-to-identifier and small text transforms.
//!
//! Every artifact the generator writes is keyed by the slug of its keyword:
//! the output directory `posts/<slug>/`, the cached body `llm/<slug>.md`, and
//! the cover image `assets/<slug>.png`. The slug is therefore the one piece of
//! naming that must never drift between runs.
//!
//! ## Slug rules
//!
//! - non-ASCII characters are transliterated (`café` → `cafe`, `ç` → `c`)
//! - the result is lowercased
//! - anything outside `[a-z0-9-]` and whitespace is dropped
//! - whitespace and dash runs collapse into a single `-`
//! - leading and trailing dashes are trimmed
//!
//! ```text
//! "Café Gelado!"          → "cafe-gelado"
//! "  Filtro de papel vs metal " → "filtro-de-papel-vs-metal"
//! "moagem -- aeropress"   → "moagem-aeropress"
//! ```

use deunicode::deunicode;

/// Derive the URL-safe identifier for a keyword.
///
/// Deterministic and idempotent: `slugify(&slugify(x)) == slugify(x)`.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    // Starts true so leading separators never emit a dash.
    let mut prev_dash = true;
    for c in ascii.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            prev_dash = false;
        } else if (c == '-' || c.is_whitespace()) && !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Uppercase the first character and lowercase the rest.
///
/// `"café GELADO"` → `"Café gelado"`.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Cap `text` at `max_chars` characters, ending in `...` when cut.
///
/// Counts characters, not bytes, so accented titles are never split
/// mid-codepoint.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap_words(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}
