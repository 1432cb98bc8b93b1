//! Cached text rows.
//!
//! One row per `(section, unit_index, version)`. The whole table is replaced
//! on every persist, so rows on disk always mirror the in-memory map at the
//! time of the last successful save.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

use super::connection::CacheDb;
use crate::Error;
use crate::plan::ContentUnit;

/// Cache key: a content unit in a given version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub section: String,
    pub index: u32,
    pub version: String,
}

impl CacheKey {
    pub fn new(unit: &ContentUnit, version: &str) -> Self {
        Self { section: unit.section.clone(), index: unit.index, version: version.to_string() }
    }
}

/// A cached text with the moment it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry has outlived `expiry` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, expiry: chrono::Duration) -> bool {
        now - self.fetched_at >= expiry
    }
}

/// Fixed-width UTC timestamps so rows compare correctly as text.
fn to_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl CacheDb {
    /// Load every stored entry.
    ///
    /// Rows with an unparseable timestamp are skipped.
    pub async fn load_entries(&self) -> Result<Vec<CacheEntry>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<CacheEntry>, Error> {
                let mut stmt =
                    conn.prepare("SELECT section, unit_index, version, text, fetched_at FROM text_cache")?;
                let rows = stmt.query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                })?;

                let mut entries = Vec::new();
                for row in rows {
                    let (section, index, version, text, fetched_at) = row?;
                    match DateTime::parse_from_rfc3339(&fetched_at) {
                        Ok(ts) => entries.push(CacheEntry {
                            key: CacheKey { section, index, version },
                            text,
                            fetched_at: ts.with_timezone(&Utc),
                        }),
                        Err(e) => {
                            tracing::warn!(%section, index, error = %e, "skipping cache row with bad timestamp");
                        }
                    }
                }
                Ok(entries)
            })
            .await
            .map_err(Error::from)
    }

    /// Replace the stored entries with `entries` in one transaction.
    pub async fn replace_entries(&self, entries: Vec<CacheEntry>) -> Result<usize, Error> {
        self.conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM text_cache", [])?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO text_cache (section, unit_index, version, text, fetched_at)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                    )?;
                    for entry in &entries {
                        stmt.execute(params![
                            &entry.key.section,
                            entry.key.index,
                            &entry.key.version,
                            &entry.text,
                            to_timestamp(entry.fetched_at),
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(entries.len())
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored entries.
    #[cfg(test)]
    pub async fn count_entries(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM text_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(section: &str, index: u32, fetched_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry {
            key: CacheKey::new(&ContentUnit::new(section, index), "web"),
            text: format!("{section} {index} text"),
            fetched_at,
        }
    }

    #[tokio::test]
    async fn test_replace_and_load() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let now = Utc::now();

        let written = db
            .replace_entries(vec![entry("Genesis", 1, now), entry("Genesis", 2, now)])
            .await
            .unwrap();
        assert_eq!(written, 2);

        let mut loaded = db.load_entries().await.unwrap();
        loaded.sort_by_key(|e| e.key.index);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].text, "Genesis 1 text");
        assert_eq!(loaded[1].key.version, "web");
    }

    #[tokio::test]
    async fn test_replace_overwrites_previous_rows() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let now = Utc::now();

        db.replace_entries(vec![entry("Genesis", 1, now), entry("Exodus", 1, now)])
            .await
            .unwrap();
        db.replace_entries(vec![entry("Mark", 1, now)]).await.unwrap();

        let loaded = db.load_entries().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].key.section, "Mark");
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let expiry = Duration::days(30);
        assert!(entry("Job", 1, now - expiry).is_expired(now, expiry));
        assert!(!entry("Job", 1, now - expiry + Duration::seconds(1)).is_expired(now, expiry));
    }
}
