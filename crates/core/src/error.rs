//! Unified error types for lectio.
//!
//! Only `UnknownPlan`, `BadRequest` and `Assembly` are ever shown to a feed
//! reader. Fetch and persistence errors are absorbed by the acquisition chain
//! and the cache respectively.

use tokio_rusqlite::rusqlite;

/// Unified error type shared by the lectio crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Plan token outside the known set.
    #[error("UNKNOWN_PLAN: {0}")]
    UnknownPlan(String),

    /// Unparseable start date, malformed pace segment or zero pace.
    #[error("BAD_REQUEST: {0}")]
    BadRequest(String),

    /// A text source had nothing usable for a unit.
    #[error("FETCH_MISS: {0}")]
    FetchMiss(String),

    /// Upstream answered with a transport or status error.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Upstream did not answer within the attempt timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Anything else that went wrong while building a feed.
    #[error("ASSEMBLY_FAILED: {0}")]
    Assembly(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
