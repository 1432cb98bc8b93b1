//! Reading plans: the static catalog and the per-day scheduler.
//!
//! A plan is an ordered list of sections, each an ordered list of
//! `(book, chapter count)` pairs. Flattening a plan yields every chapter in
//! reading order; the scheduler slices that list by elapsed days and pace.

pub mod catalog;
pub mod schedule;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

pub use catalog::{NEW_TESTAMENT, OLD_TESTAMENT, PROVERBS, PSALMS, PlanSection, resolve};
pub use schedule::{MAX_DAILY_CHAPTERS, MixedPace, Pace, ReadingSchedule, chapters_for_day, elapsed_days, mixed_chapters_for_day};

/// One addressable chunk of text: a book and a 1-based chapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentUnit {
    pub section: String,
    pub index: u32,
}

impl ContentUnit {
    pub fn new(section: impl Into<String>, index: u32) -> Self {
        Self { section: section.into(), index }
    }
}

impl fmt::Display for ContentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.section, self.index)
    }
}

/// The closed set of plan tokens accepted in feed URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Ot,
    Nt,
    Full,
    Psalms,
    Proverbs,
    Mixed,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Ot => "ot",
            PlanType::Nt => "nt",
            PlanType::Full => "full",
            PlanType::Psalms => "psalms",
            PlanType::Proverbs => "proverbs",
            PlanType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ot" => Ok(PlanType::Ot),
            "nt" => Ok(PlanType::Nt),
            "full" => Ok(PlanType::Full),
            "psalms" => Ok(PlanType::Psalms),
            "proverbs" => Ok(PlanType::Proverbs),
            "mixed" => Ok(PlanType::Mixed),
            other => Err(Error::UnknownPlan(format!(
                "'{other}' is not one of ot, nt, full, psalms, proverbs, mixed"
            ))),
        }
    }
}
