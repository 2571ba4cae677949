use chrono::{SecondsFormat, Utc};
use directories::UserDirs;
use ellipse::Ellipse;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

pub const EXCERPT_LENGTH: usize = 200;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap());
static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").unwrap());
static EDGE_HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-+|-+$").unwrap());
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static IMG_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<img[^>]+src="([^">]+)""#).unwrap());

/// URL-friendly slug. Non-ASCII letters are dropped, not transliterated.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(lowered.trim(), "");
    let hyphenated = SLUG_SEPARATORS.replace_all(&cleaned, "-");

    EDGE_HYPHENS.replace_all(&hyphenated, "").into_owned()
}

pub fn strip_html(content: &str) -> String {
    HTML_TAG.replace_all(content, "").into_owned()
}

/// Plain-text excerpt of at most [`EXCERPT_LENGTH`] grapheme clusters plus
/// "...", cut back to the last full word when one fits.
pub fn extract_excerpt(content: &str) -> String {
    let stripped = strip_html(content);
    let truncated = stripped.as_str().truncate_ellipse(EXCERPT_LENGTH).to_string();

    if truncated == stripped {
        return stripped;
    }

    let window = truncated.strip_suffix("...").unwrap_or(&truncated);
    match window.rfind(' ') {
        Some(last_space) if last_space > 0 => format!("{}...", &window[..last_space]),
        _ => format!("{window}..."),
    }
}

pub fn extract_first_image(html: &str) -> Option<String> {
    IMG_SRC
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|src| src.as_str().to_string())
}

pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn get_config_dir() -> Option<PathBuf> {
    UserDirs::new().map(|user_dirs| user_dirs.home_dir().join(".config").join("blog-feed"))
}
