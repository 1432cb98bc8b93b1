//! Text sources for the acquisition chain.
//!
//! A source either produces usable text for a unit or fails; the provider
//! treats every failure as a miss and moves on to the next source. The
//! placeholder in [`fallback`] is not a source because it cannot fail.

pub mod api;
pub mod fallback;
pub mod scrape;

pub use api::ApiSource;
pub use fallback::placeholder_text;
pub use scrape::ScrapeSource;

use async_trait::async_trait;
use lectio_core::{ContentUnit, Error};

/// One tier of the acquisition chain.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the text of `unit` in `version`.
    ///
    /// # Errors
    ///
    /// `Error::FetchMiss` when the upstream answered without usable text,
    /// `Error::HttpError` or `Error::FetchTimeout` on transport problems.
    async fn fetch(&self, unit: &ContentUnit, version: &str) -> Result<String, Error>;
}
