use serde::Serialize;
use serde_json::Value;

use crate::content::decode_to_html;
use crate::extract::{extract_image_urls, extract_plain_text};

/// Display data derived from one HTML string. Recomputed on every render.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Preview {
    pub images: Vec<String>,
    pub thumbnail: Option<String>,
    pub text_preview: String,
}

impl Preview {
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        let images = extract_image_urls(html);
        let thumbnail = images.first().cloned();
        Self {
            images,
            thumbnail,
            text_preview: extract_plain_text(html),
        }
    }

    /// Decodes an envelope-or-string field before extracting.
    #[must_use]
    pub fn from_content(content: &Value) -> Self {
        Self::from_html(&decode_to_html(content))
    }
}

/// Cuts `text` to at most `max` characters, appending `...` when it cuts.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_content_yields_thumbnail_and_text() {
        let contents = json!({
            "type": "doc",
            "content": [{ "type": "html", "html": r#"<p>Intro</p><img src="https://x/1.jpg">"# }]
        });
        let preview = Preview::from_content(&contents);
        assert_eq!(preview.thumbnail.as_deref(), Some("https://x/1.jpg"));
        assert_eq!(preview.text_preview, "Intro");
        assert_eq!(preview.images, vec!["https://x/1.jpg"]);
    }

    #[test]
    fn thumbnail_is_first_image() {
        let preview = Preview::from_html(r#"<img src="b.png"><img src="a.png">"#);
        assert_eq!(preview.thumbnail.as_deref(), Some("b.png"));
        assert_eq!(preview.images.len(), 2);
    }

    #[test]
    fn no_images_means_no_thumbnail() {
        let preview = Preview::from_html("<p>text only</p>");
        assert_eq!(preview.thumbnail, None);
        assert_eq!(preview.text_preview, "text only");
    }

    #[test]
    fn malformed_content_gives_empty_preview() {
        assert_eq!(Preview::from_content(&json!({ "type": "doc" })), Preview::default());
        assert_eq!(Preview::from_content(&Value::Null), Preview::default());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("Сайн байна уу", 4), "Сайн...");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exact", 5), "exact");
        assert_eq!(truncate_chars("ab cd", 3), "ab...");
    }
}
