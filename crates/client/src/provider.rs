//! Cache-first text acquisition.
//!
//! `TextProvider::get_text` never fails: it answers from the cache, then
//! walks the configured sources in order, and finally falls back to the
//! placeholder. Whatever it resolves is written to the cache before it
//! returns. Network-originating resolutions are followed by a fixed pause
//! so a cold feed does not hammer the upstreams; a cold feed with `n`
//! uncached units therefore takes at least `n × delay`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use lectio_core::{AppConfig, CacheKey, ContentUnit, Error, TextCache};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::fetch::{FetchClient, FetchConfig};
use crate::source::{ApiSource, ScrapeSource, TextSource, placeholder_text};

/// Resolves unit texts through the cache and the source chain.
#[derive(Clone)]
pub struct TextProvider {
    cache: Arc<TextCache>,
    sources: Vec<Arc<dyn TextSource>>,
    delay: Duration,
    concurrency: usize,
}

impl TextProvider {
    /// A provider over `sources`, tried in order. No delay, no parallelism.
    pub fn new(cache: Arc<TextCache>, sources: Vec<Arc<dyn TextSource>>) -> Self {
        Self { cache, sources, delay: Duration::ZERO, concurrency: 1 }
    }

    /// The API then scrape chain described by `config`.
    pub fn from_config(config: &AppConfig, cache: Arc<TextCache>) -> Result<Self, Error> {
        let client = FetchClient::new(FetchConfig { user_agent: config.user_agent.clone(), ..FetchConfig::default() })?;
        let sources: Vec<Arc<dyn TextSource>> = vec![
            Arc::new(ApiSource::new(client.clone(), config.api_url.clone(), config.api_timeout())),
            Arc::new(ScrapeSource::new(client, config.scrape_url.clone(), config.scrape_timeout())),
        ];

        Ok(Self::new(cache, sources)
            .with_delay(config.fetch_delay())
            .with_concurrency(config.fetch_concurrency))
    }

    /// Pause after every network-originating resolution.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Resolve up to `concurrency` units at once in [`TextProvider::get_many`].
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn cache(&self) -> &Arc<TextCache> {
        &self.cache
    }

    /// Text for `unit` in `version`. Always returns usable text.
    pub async fn get_text(&self, unit: &ContentUnit, version: &str) -> String {
        let key = CacheKey::new(unit, version);
        if let Some(text) = self.cache.get(&key).await {
            tracing::trace!(%unit, version, "cache hit");
            return text;
        }

        let text = self.resolve(unit, version).await;
        self.cache.set(key, text.clone()).await;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        text
    }

    /// Texts for every distinct unit in `units`, each resolved once.
    pub async fn get_many(&self, units: &[ContentUnit], version: &str) -> HashMap<ContentUnit, String> {
        let mut seen = HashSet::new();
        let distinct: Vec<ContentUnit> = units.iter().filter(|unit| seen.insert(*unit)).cloned().collect();
        let mut texts = HashMap::with_capacity(distinct.len());

        if self.concurrency <= 1 {
            for unit in distinct {
                let text = self.get_text(&unit, version).await;
                texts.insert(unit, text);
            }
            return texts;
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set = JoinSet::new();

        for unit in distinct.iter().cloned() {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let provider = self.clone();
            let version = version.to_string();

            join_set.spawn(async move {
                let _permit = permit;
                let text = provider.get_text(&unit, &version).await;
                (unit, text)
            });
        }

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((unit, text)) => {
                    texts.insert(unit, text);
                }
                Err(e) => tracing::warn!(error = %e, "text task failed"),
            }
        }

        for unit in distinct {
            texts.entry(unit).or_insert_with_key(placeholder_text);
        }

        texts
    }

    async fn resolve(&self, unit: &ContentUnit, version: &str) -> String {
        for source in &self.sources {
            match source.fetch(unit, version).await {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::info!(%unit, source = source.name(), "fetched text");
                    return text;
                }
                Ok(_) => tracing::debug!(%unit, source = source.name(), "empty text"),
                Err(e) => tracing::debug!(%unit, source = source.name(), error = %e, "source missed"),
            }
        }

        tracing::warn!(%unit, version, "all sources missed, using placeholder");
        placeholder_text(unit)
    }
}
