use std::time::Duration;

use anyhow::Context as _;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::records::{Category, Record, record_from_body, records_from_body, unwrap_data};

pub const API_URL_ENV: &str = "NEWSDESK_API_URL";
pub const DEFAULT_API_URL: &str = "https://bodi-backend-api.azurewebsites.net";

/// Resolves the backend base URL: explicit flag, then env, then default.
pub fn resolve_base_url(flag: Option<&str>) -> anyhow::Result<Url> {
    let raw = match flag {
        Some(raw) => raw.to_owned(),
        None => std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_owned()),
    };
    parse_base_url(&raw).with_context(|| format!("invalid api url: {raw:?}"))
}

fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(raw.trim()).context("parse url")?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("url scheme must be http/https");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build api http client")?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self, category: Category) -> anyhow::Result<Url> {
        self.base_url
            .join(&category.collection_path())
            .with_context(|| format!("build url for {}", category.as_str()))
    }

    fn item_url(&self, category: Category, id: &str) -> anyhow::Result<Url> {
        let mut url = self.collection_url(category)?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("api url cannot be a base: {}", self.base_url))?
            .push(id);
        Ok(url)
    }

    pub async fn list(&self, category: Category) -> anyhow::Result<Vec<Record>> {
        let url = self.collection_url(category)?;
        let body = self.send(self.client.get(url.clone()), &url).await?;
        records_from_body(body).with_context(|| format!("parse list from {url}"))
    }

    pub async fn get(&self, category: Category, id: &str) -> anyhow::Result<Record> {
        let url = self.item_url(category, id)?;
        let body = self.send(self.client.get(url.clone()), &url).await?;
        record_from_body(body)
    }

    pub async fn create<T: Serialize + ?Sized>(
        &self,
        category: Category,
        payload: &T,
    ) -> anyhow::Result<Value> {
        let url = self.collection_url(category)?;
        let body = self
            .send(self.client.post(url.clone()).json(payload), &url)
            .await?;
        Ok(unwrap_data(body))
    }

    pub async fn update<T: Serialize + ?Sized>(
        &self,
        category: Category,
        id: &str,
        payload: &T,
    ) -> anyhow::Result<Value> {
        let url = self.item_url(category, id)?;
        let body = self
            .send(self.client.put(url.clone()).json(payload), &url)
            .await?;
        Ok(unwrap_data(body))
    }

    pub async fn delete(&self, category: Category, id: &str) -> anyhow::Result<()> {
        let url = self.item_url(category, id)?;
        self.send(self.client.delete(url.clone()), &url).await?;
        Ok(())
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> anyhow::Result<Value> {
        tracing::debug!(%url, "api request");
        let response = request
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .with_context(|| format!("request {url}"))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .with_context(|| format!("read response body from {url}"))?;
        if !status.is_success() {
            let message = parse_error_message(&raw).unwrap_or(raw);
            anyhow::bail!("api error ({status}) from {url}: {message}");
        }
        if raw.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&raw).with_context(|| format!("parse response from {url}"))
    }
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw_json).ok()?;
    let message = value
        .get("message")
        .or_else(|| value.get("error"))?
        .as_str()?
        .to_owned();
    Some(message)
}
