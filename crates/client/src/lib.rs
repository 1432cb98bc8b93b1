//! Text acquisition for lectio.
//!
//! This crate provides the HTTP fetch pipeline, the structured and markup
//! text sources, and the cache-first [`TextProvider`] shared by the server.

pub mod fetch;
pub mod provider;
pub mod source;

pub use fetch::{FetchClient, FetchConfig, FetchResponse, ReaderLink, passage_link, reader_links};
pub use provider::TextProvider;
pub use source::{ApiSource, ScrapeSource, TextSource, placeholder_text};
