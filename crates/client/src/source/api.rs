//! Structured JSON text source.
//!
//! The upstream answers with a list of `{ "verse": .., "text": .. }` objects
//! for the requested chapter. Its translation is fixed upstream, so the
//! requested version only affects the cache key.

use std::time::Duration;

use async_trait::async_trait;
use lectio_core::{ContentUnit, Error};
use serde::Deserialize;
use serde_json::Value;

use super::TextSource;
use crate::fetch::{FetchClient, api_url};

#[derive(Debug, Deserialize)]
struct ApiVerse {
    #[serde(default)]
    verse: Value,
    #[serde(default)]
    text: String,
}

fn verse_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Turn an API payload into `"{verse}. {text}"` lines.
///
/// # Errors
///
/// `Error::FetchMiss` if the payload is not a list of verses, is empty, or
/// carries no text at all.
pub fn format_verses(body: &str) -> Result<String, Error> {
    let verses: Vec<ApiVerse> =
        serde_json::from_str(body).map_err(|e| Error::FetchMiss(format!("malformed payload: {e}")))?;

    if verses.iter().all(|v| v.text.trim().is_empty()) {
        return Err(Error::FetchMiss("empty payload".into()));
    }

    Ok(verses
        .iter()
        .map(|v| format!("{}. {}", verse_label(&v.verse), v.text.trim()))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Text source backed by the structured API.
#[derive(Debug, Clone)]
pub struct ApiSource {
    client: FetchClient,
    base_url: String,
    timeout: Duration,
}

impl ApiSource {
    pub fn new(client: FetchClient, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self { client, base_url: base_url.into(), timeout }
    }
}

#[async_trait]
impl TextSource for ApiSource {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn fetch(&self, unit: &ContentUnit, _version: &str) -> Result<String, Error> {
        let url = api_url(&self.base_url, unit).map_err(|e| Error::HttpError(e.to_string()))?;
        let response = self.client.get(&url, "application/json", self.timeout).await?;
        format_verses(&response.text())
    }
}
