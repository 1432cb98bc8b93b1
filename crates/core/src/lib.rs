//! Core types and shared functionality for lectio.
//!
//! This crate provides:
//! - The reading-plan catalog and day scheduler
//! - The persistent text cache with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod plan;

pub use cache::{CacheKey, TextCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use plan::{ContentUnit, MixedPace, Pace, PlanType, ReadingSchedule};
