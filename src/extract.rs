//! Image and text extraction from editor-authored HTML.
//!
//! These are pattern scans, not a parser: the markup comes from the paired
//! rich-text editor and stays simple. Entities are left undecoded and an
//! escaped quote inside `src` is not special.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#).expect("valid img src regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Lazily yields `src` values of `<img>` tags in document order.
pub fn image_urls(html: &str) -> impl Iterator<Item = &str> + '_ {
    IMG_SRC
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[must_use]
pub fn extract_image_urls(html: &str) -> Vec<String> {
    image_urls(html).map(str::to_owned).collect()
}

/// Like [`extract_image_urls`], but tolerates a non-string JSON value.
#[must_use]
pub fn extract_image_urls_value(value: &Value) -> Vec<String> {
    value.as_str().map(extract_image_urls).unwrap_or_default()
}

#[must_use]
pub fn extract_plain_text(html: &str) -> String {
    TAG.replace_all(html, "").trim().to_owned()
}

#[must_use]
pub fn extract_plain_text_value(value: &Value) -> String {
    value.as_str().map(extract_plain_text).unwrap_or_default()
}
