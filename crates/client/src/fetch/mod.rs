//! HTTP fetch pipeline shared by the text sources.
//!
//! ### Per-attempt timeouts
//! - Every request carries its own timeout, so the API and scrape sources
//!   can bound their attempts differently on one shared connection pool.
//! - A timed-out attempt maps to `Error::FetchTimeout`.
//!
//! ### Safety limits
//! - Max redirects: 5
//! - Max body bytes: 2MB (configurable)
//! - Non-success statuses are errors, never bodies.

pub mod links;

use bytes::Bytes;
use reqwest::{Client, Url, header};
use std::time::{Duration, Instant};

pub use links::{LinkError, ReaderLink, api_url, passage_link, reader_links, scrape_url};

use lectio_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string sent with every request
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 2MB)
    pub max_bytes: usize,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; lectio-feed/0.1)".to_string(),
            max_bytes: 2 * 1024 * 1024,
            max_redirects: 5,
        }
    }
}

/// Body of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub bytes: Bytes,
}

impl FetchResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// HTTP client with per-request timeouts and body limits.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// GET `url`, giving up after `timeout`.
    pub async fn get(&self, url: &Url, accept: &str, timeout: Duration) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, accept)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {} from {}", status.as_u16(), url)));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::HttpError(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let bytes = response.bytes().await.map_err(|e| classify(url, e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::HttpError(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(%url, %final_url, fetch_ms, bytes = bytes.len(), "fetched");

        Ok(FetchResponse { bytes })
    }
}

fn classify(url: &Url, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(url.to_string())
    } else {
        Error::HttpError(format!("network error: {}", err))
    }
}
