use anyhow::Context as _;
use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::content::{Envelope, decode_to_html, encode_from_html};
use crate::preview::Preview;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    News,
    Development,
    Nature,
    Rndpartner,
    Rndexchange,
    Rndresearch,
    Person,
    Videonews,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Development => "development",
            Self::Nature => "nature",
            Self::Rndpartner => "rndpartner",
            Self::Rndexchange => "rndexchange",
            Self::Rndresearch => "rndresearch",
            Self::Person => "person",
            Self::Videonews => "videonews",
        }
    }

    /// Columns of the combined "all" feed.
    pub const ALL_FEED: [Category; 3] = [Self::Development, Self::Nature, Self::Person];

    /// Whether records are authored as an HTML envelope in `contents`.
    /// Video records carry a plain `description` plus `url`/`meta` instead.
    pub fn has_rich_contents(self) -> bool {
        !matches!(self, Self::Videonews)
    }

    /// Collection path relative to the API base, e.g. `api/news`.
    pub fn collection_path(self) -> String {
        format!("api/{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(deserialize_with = "id_from_value")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub viewers: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_research: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn id_from_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "record id must be a string or number, got {other}"
        ))),
    }
}

impl Record {
    /// Flat HTML body: `contents` if it decodes to something, else `description`.
    pub fn html(&self) -> String {
        let from_contents = self.contents.as_ref().map(decode_to_html).unwrap_or_default();
        if !from_contents.is_empty() {
            return from_contents;
        }
        self.description
            .as_ref()
            .map(decode_to_html)
            .unwrap_or_default()
    }

    pub fn card(&self, category: Option<Category>) -> Card {
        let preview = Preview::from_html(&self.html());
        Card {
            id: self.id.clone(),
            title: self.title.clone(),
            category,
            status: self.status,
            created_at: self.created_at.clone(),
            thumbnail: preview.thumbnail,
            text_preview: preview.text_preview,
        }
    }
}

/// One list entry as the card renderer needs it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub status: bool,
    pub created_at: String,
    pub thumbnail: Option<String>,
    pub text_preview: String,
}

/// The backend answers either `{ "data": X }` or a bare `X`.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut obj) if obj.contains_key("data") => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub fn records_from_body(body: Value) -> anyhow::Result<Vec<Record>> {
    let items = match unwrap_data(body) {
        Value::Array(items) => items,
        other => anyhow::bail!("expected a list of records, got {}", json_kind(&other)),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Record>(item) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(index, %err, "skipping malformed record"),
        }
    }
    Ok(records)
}

pub fn record_from_body(body: Value) -> anyhow::Result<Record> {
    serde_json::from_value(unwrap_data(body)).context("parse record")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Editor state for a record being created or edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub html: String,
    pub status: bool,
    pub position: bool,
    pub is_research: bool,
    pub created_at: Option<NaiveDate>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: String::new(),
            html: String::new(),
            status: true,
            position: false,
            is_research: true,
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavePayload {
    pub title: String,
    pub contents: Envelope,
    pub status: bool,
    pub position: bool,
    pub is_research: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Draft {
    /// Builds the request body. `created_at` is only sent when editing.
    pub fn to_payload(&self, editing: bool) -> anyhow::Result<SavePayload> {
        if self.title.trim().is_empty() || self.html.trim().is_empty() {
            anyhow::bail!("title and content must not be empty");
        }

        let created_at = match (editing, self.created_at) {
            (true, Some(date)) => Some(
                date.and_time(NaiveTime::MIN)
                    .and_utc()
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            _ => None,
        };

        Ok(SavePayload {
            title: self.title.trim().to_owned(),
            contents: encode_from_html(&self.html),
            status: self.status,
            position: self.position,
            is_research: self.is_research,
            created_at,
        })
    }
}
