//! Process-wide text cache.
//!
//! An in-memory map guarded by a single async mutex, backed by SQLite.
//! Writes are persisted in batches: whenever the entry count reaches a
//! multiple of the save batch, and on every explicit [`TextCache::flush`].
//!
//! Persistence failures are logged and never surface to callers; a cache
//! whose database cannot be opened keeps working in memory only.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use super::connection::CacheDb;
use super::entries::{CacheEntry, CacheKey};

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    dirty: bool,
}

/// Expiring key/value store for fetched texts.
#[derive(Debug)]
pub struct TextCache {
    db: Option<CacheDb>,
    expiry: Duration,
    save_batch: usize,
    state: Mutex<CacheState>,
}

impl TextCache {
    /// Open the cache file at `path` and load its unexpired entries.
    ///
    /// Falls back to a memory-only cache if the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>, expiry: Duration, save_batch: usize) -> Self {
        let path = path.as_ref();
        match CacheDb::open(path).await {
            Ok(db) => Self::with_db(db, expiry, save_batch).await,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache file unavailable, caching in memory only");
                Self::in_memory(expiry, save_batch)
            }
        }
    }

    /// Build a cache over an open database, discarding expired rows.
    pub async fn with_db(db: CacheDb, expiry: Duration, save_batch: usize) -> Self {
        let now = Utc::now();
        let mut state = CacheState::default();

        match db.load_entries().await {
            Ok(stored) => {
                let total = stored.len();
                state.entries = stored
                    .into_iter()
                    .filter(|entry| !entry.is_expired(now, expiry))
                    .map(|entry| (entry.key.clone(), entry))
                    .collect();
                let discarded = total - state.entries.len();
                state.dirty = discarded > 0;
                tracing::info!(entries = state.entries.len(), discarded, "loaded text cache");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load text cache, starting empty");
            }
        }

        Self { db: Some(db), expiry, save_batch: save_batch.max(1), state: Mutex::new(state) }
    }

    /// A cache with no backing file.
    pub fn in_memory(expiry: Duration, save_batch: usize) -> Self {
        Self { db: None, expiry, save_batch: save_batch.max(1), state: Mutex::new(CacheState::default()) }
    }

    /// Whether the cache writes through to a database.
    pub fn is_persistent(&self) -> bool {
        self.db.is_some()
    }

    /// Look up a text, evicting it if it has expired.
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        self.get_at(key, Utc::now()).await
    }

    /// [`TextCache::get`] as seen at `now`.
    pub async fn get_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<String> {
        let mut state = self.state.lock().await;
        match state.entries.get(key) {
            None => return None,
            Some(entry) if !entry.is_expired(now, self.expiry) => return Some(entry.text.clone()),
            Some(_) => {}
        }

        state.entries.remove(key);
        state.dirty = true;
        tracing::debug!(section = %key.section, index = key.index, "evicted expired cache entry");
        None
    }

    /// Store a text fetched now.
    pub async fn set(&self, key: CacheKey, text: String) {
        self.set_at(key, text, Utc::now()).await;
    }

    /// Store a text with an explicit fetch time.
    pub async fn set_at(&self, key: CacheKey, text: String, fetched_at: DateTime<Utc>) {
        let mut state = self.state.lock().await;
        state.entries.insert(key.clone(), CacheEntry { key, text, fetched_at });
        state.dirty = true;

        if state.entries.len() % self.save_batch == 0 {
            self.persist(&mut state).await;
        }
    }

    /// Persist the current state if anything changed since the last save.
    pub async fn flush(&self) {
        let mut state = self.state.lock().await;
        if state.dirty {
            self.persist(&mut state).await;
        }
    }

    /// Drop every entry that has expired at `now`.
    ///
    /// Returns the number of evicted entries.
    pub async fn evict_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(now, self.expiry));
        let evicted = before - state.entries.len();
        if evicted > 0 {
            state.dirty = true;
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Whether there are changes not yet written to disk.
    pub async fn is_dirty(&self) -> bool {
        self.state.lock().await.dirty
    }

    async fn persist(&self, state: &mut CacheState) {
        let Some(db) = &self.db else {
            state.dirty = false;
            return;
        };

        let snapshot: Vec<CacheEntry> = state.entries.values().cloned().collect();
        match db.replace_entries(snapshot).await {
            Ok(saved) => {
                state.dirty = false;
                tracing::info!(entries = saved, "saved text cache");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save text cache");
            }
        }
    }
}
