//! Generation window: which dates a feed covers.
//!
//! A plan that has not started yet is shown from its first day. A running
//! plan is shown from a week ago (never before its start) so recently missed
//! days stay visible. Either way the window reaches two weeks past today.

use chrono::{Days, NaiveDate};
use lectio_core::Error;

pub const LOOKBACK_DAYS: u64 = 7;
pub const LOOKAHEAD_DAYS: u64 = 14;

/// An inclusive range of feed dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedWindow {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl FeedWindow {
    /// Window for a plan starting on `start`, seen on `today`.
    ///
    /// # Errors
    ///
    /// `Error::Assembly` if `today` is too close to the end of the calendar.
    pub fn new(start: NaiveDate, today: NaiveDate) -> Result<Self, Error> {
        let last = today
            .checked_add_days(Days::new(LOOKAHEAD_DAYS))
            .ok_or_else(|| Error::Assembly(format!("no window past {today}")))?;

        let first = if start > today {
            start
        } else {
            today.checked_sub_days(Days::new(LOOKBACK_DAYS)).map_or(start, |back| back.max(start))
        };

        Ok(Self { first, last })
    }

    /// Dates in the window, oldest first. Empty if the plan starts after it.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last;
        self.first.iter_days().take_while(move |day| *day <= last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_future_start() {
        let window = FeedWindow::new(date("2026-03-10"), date("2026-03-01")).unwrap();
        assert_eq!(window.first, date("2026-03-10"));
        assert_eq!(window.last, date("2026-03-15"));
        assert_eq!(window.days().count(), 6);
    }

    #[test]
    fn test_long_running_plan_looks_back_a_week() {
        let window = FeedWindow::new(date("2025-01-01"), date("2026-03-01")).unwrap();
        assert_eq!(window.first, date("2026-02-22"));
        assert_eq!(window.last, date("2026-03-15"));
        assert_eq!(window.days().count(), 22);
    }

    #[test]
    fn test_recent_start_is_not_passed() {
        let window = FeedWindow::new(date("2026-02-27"), date("2026-03-01")).unwrap();
        assert_eq!(window.first, date("2026-02-27"));
    }

    #[test]
    fn test_start_today() {
        let window = FeedWindow::new(date("2026-03-01"), date("2026-03-01")).unwrap();
        assert_eq!(window.first, date("2026-03-01"));
        assert_eq!(window.days().count(), 15);
    }

    #[test]
    fn test_start_beyond_lookahead_is_empty() {
        let window = FeedWindow::new(date("2026-06-01"), date("2026-03-01")).unwrap();
        assert_eq!(window.days().count(), 0);
    }

    #[test]
    fn test_end_of_calendar() {
        assert!(matches!(FeedWindow::new(NaiveDate::MAX, NaiveDate::MAX), Err(Error::Assembly(_))));
    }
}
