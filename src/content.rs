//! Conversion between the backend's document envelope and flat editor HTML.
//!
//! The backend persists rich content as
//! `{ "type": "doc", "content": [ { "type": "html", "html": "..." } ] }`
//! while the editor and every renderer work on the bare HTML string. Some
//! records are stored already flattened, so decoding accepts either shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocKind {
    #[default]
    #[serde(rename = "doc")]
    Doc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Html { html: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: DocKind,
    pub content: Vec<Block>,
}

impl Envelope {
    pub fn to_value(&self) -> Value {
        serde_json::json!(self)
    }
}

/// Wraps editor HTML into a single-block envelope.
#[must_use]
pub fn encode_from_html(html: &str) -> Envelope {
    Envelope {
        kind: DocKind::Doc,
        content: vec![Block::Html {
            html: html.to_owned(),
        }],
    }
}

/// Resolves a `contents`/`description` field to flat HTML.
///
/// Strings pass through unchanged. For objects, the first `"html"` block with
/// a non-empty `html` string wins. Anything else yields an empty string.
#[must_use]
pub fn decode_to_html(input: &Value) -> String {
    match input {
        Value::String(html) => html.clone(),
        Value::Object(doc) => {
            let Some(blocks) = doc.get("content").and_then(Value::as_array) else {
                return String::new();
            };
            blocks
                .iter()
                .filter(|block| block.get("type").and_then(Value::as_str) == Some("html"))
                .filter_map(|block| block.get("html").and_then(Value::as_str))
                .find(|html| !html.is_empty())
                .map(str::to_owned)
                .unwrap_or_default()
        }
        _ => String::new(),
    }
}
