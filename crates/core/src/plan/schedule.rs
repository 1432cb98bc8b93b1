//! Day scheduler.
//!
//! Maps `(plan, start date, pace, target date)` to the chapters read on the
//! target date. Linear sections advance `pace` chapters per elapsed day and
//! simply end. In the mixed plan the psalms and proverbs categories wrap
//! around instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{self, NEW_TESTAMENT, OLD_TESTAMENT, PROVERBS, PSALMS, PlanSection};
use super::{ContentUnit, PlanType};
use crate::Error;

/// Upper bound on chapters read in one day: the whole catalog.
pub const MAX_DAILY_CHAPTERS: u32 = 1189;

/// Per-category chapter counts for the mixed plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MixedPace {
    pub ot: u32,
    pub nt: u32,
    pub psalms: u32,
    pub proverbs: u32,
}

impl MixedPace {
    pub fn new(ot: u32, nt: u32, psalms: u32, proverbs: u32) -> Self {
        Self { ot, nt, psalms, proverbs }
    }

    /// Chapters read per day across all categories, `None` on overflow.
    pub fn total(&self) -> Option<u32> {
        self.ot.checked_add(self.nt)?.checked_add(self.psalms)?.checked_add(self.proverbs)
    }
}

/// How fast a plan is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pace {
    /// Same number of chapters every day over one flattened list.
    Uniform(u32),
    /// Independent counts per category.
    Mixed(MixedPace),
}

/// Whole days from `start` to `target`. Negative before the start.
pub fn elapsed_days(start: NaiveDate, target: NaiveDate) -> i64 {
    target.signed_duration_since(start).num_days()
}

/// Take `pace` units starting at `elapsed * pace`, truncated at the end.
fn linear_slice(units: &[ContentUnit], elapsed: i64, pace: u32) -> Vec<ContentUnit> {
    if pace == 0 || elapsed < 0 {
        return Vec::new();
    }
    let Some(cursor) = elapsed.checked_mul(i64::from(pace)).and_then(|c| usize::try_from(c).ok()) else {
        return Vec::new();
    };
    if cursor >= units.len() {
        return Vec::new();
    }
    let end = cursor.saturating_add(pace as usize).min(units.len());
    units[cursor..end].to_vec()
}

/// Take `pace` units starting at `elapsed * pace`, wrapping modulo the section size.
fn cyclic_slice(section: &PlanSection, elapsed: i64, pace: u32) -> Vec<ContentUnit> {
    let total = i64::from(section.total_units());
    if pace == 0 || total == 0 {
        return Vec::new();
    }
    let units = section.flatten();
    let start = (elapsed.wrapping_mul(i64::from(pace))).rem_euclid(total);
    (0..i64::from(pace))
        .map(|i| {
            let index = (start + i).rem_euclid(total) as usize;
            units[index].clone()
        })
        .collect()
}

/// Chapters for `target` in a single-list plan.
///
/// # Errors
///
/// Returns `Error::BadRequest` for the mixed plan, which needs per-category
/// paces (see [`mixed_chapters_for_day`]).
pub fn chapters_for_day(
    plan: PlanType, start: NaiveDate, pace: u32, target: NaiveDate,
) -> Result<Vec<ContentUnit>, Error> {
    if plan == PlanType::Mixed {
        return Err(Error::BadRequest("the mixed plan needs four per-category paces".into()));
    }
    let units = catalog::flatten(plan);
    Ok(linear_slice(&units, elapsed_days(start, target), pace))
}

/// Chapters for `target` in the mixed plan, in category order
/// (old testament, new testament, psalms, proverbs).
pub fn mixed_chapters_for_day(pace: &MixedPace, start: NaiveDate, target: NaiveDate) -> Vec<ContentUnit> {
    let elapsed = elapsed_days(start, target);
    let mut units = Vec::with_capacity(pace.total().map_or(0, |n| n.min(MAX_DAILY_CHAPTERS)) as usize);
    units.extend(linear_slice(&OLD_TESTAMENT.flatten(), elapsed, pace.ot));
    units.extend(linear_slice(&NEW_TESTAMENT.flatten(), elapsed, pace.nt));
    units.extend(cyclic_slice(&PSALMS, elapsed, pace.psalms));
    units.extend(cyclic_slice(&PROVERBS, elapsed, pace.proverbs));
    units
}

/// A validated plan and pace, ready to be asked about any date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingSchedule {
    plan: PlanType,
    pace: Pace,
    start: NaiveDate,
}

impl ReadingSchedule {
    /// Pair a plan with its pace and start date.
    ///
    /// # Errors
    ///
    /// Returns `Error::BadRequest` when the pace kind does not match the plan,
    /// when no chapters would ever be read, or when a day would read more than
    /// [`MAX_DAILY_CHAPTERS`].
    pub fn new(plan: PlanType, pace: Pace, start: NaiveDate) -> Result<Self, Error> {
        let too_fast = || Error::BadRequest(format!("pace must not exceed {MAX_DAILY_CHAPTERS} chapters per day"));

        match (plan, pace) {
            (PlanType::Mixed, Pace::Mixed(p)) => match p.total() {
                Some(0) => Err(Error::BadRequest("mixed pace must read at least one chapter per day".into())),
                Some(n) if n <= MAX_DAILY_CHAPTERS => Ok(Self { plan, pace, start }),
                _ => Err(too_fast()),
            },
            (PlanType::Mixed, Pace::Uniform(_)) => {
                Err(Error::BadRequest("the mixed plan needs four per-category paces".into()))
            }
            (_, Pace::Mixed(_)) => Err(Error::BadRequest(format!("plan '{plan}' takes a single pace"))),
            (_, Pace::Uniform(0)) => Err(Error::BadRequest("pace must be at least one chapter per day".into())),
            (_, Pace::Uniform(n)) if n > MAX_DAILY_CHAPTERS => Err(too_fast()),
            (_, Pace::Uniform(_)) => Ok(Self { plan, pace, start }),
        }
    }

    pub fn plan(&self) -> PlanType {
        self.plan
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Chapters read on `target`. Empty once a linear plan is exhausted.
    pub fn units_for(&self, target: NaiveDate) -> Vec<ContentUnit> {
        match self.pace {
            Pace::Mixed(pace) => mixed_chapters_for_day(&pace, self.start, target),
            Pace::Uniform(pace) => {
                let units = catalog::flatten(self.plan);
                linear_slice(&units, elapsed_days(self.start, target), pace)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_nt_example() {
        let units = chapters_for_day(PlanType::Nt, date("2024-01-01"), 2, date("2024-01-02")).unwrap();
        let nt = NEW_TESTAMENT.flatten();
        assert_eq!(units, vec![nt[2].clone(), nt[3].clone()]);
        assert_eq!(units, vec![ContentUnit::new("Matthew", 3), ContentUnit::new("Matthew", 4)]);
    }

    #[test]
    fn test_consecutive_days_partition_plan() {
        let start = date("2024-03-10");
        for plan in [PlanType::Ot, PlanType::Nt, PlanType::Full, PlanType::Psalms, PlanType::Proverbs] {
            let all = catalog::flatten(plan);
            for pace in [1, 2, 3, 7] {
                let mut seen = Vec::new();
                let mut day = start;
                loop {
                    let units = chapters_for_day(plan, start, pace, day).unwrap();
                    if units.is_empty() {
                        break;
                    }
                    let offset = seen.len();
                    assert!(units.len() <= pace as usize);
                    assert_eq!(units.as_slice(), &all[offset..offset + units.len()], "{plan} pace {pace}");
                    if units.len() < pace as usize {
                        assert_eq!(offset + units.len(), all.len());
                    }
                    seen.extend(units);
                    day = day.checked_add_days(Days::new(1)).unwrap();
                }
                assert_eq!(seen, all, "{plan} pace {pace}");
            }
        }
    }

    #[test]
    fn test_linear_plan_ends() {
        let start = date("2024-01-01");
        let last_day = start.checked_add_days(Days::new(259)).unwrap();
        let units = chapters_for_day(PlanType::Nt, start, 1, last_day).unwrap();
        assert_eq!(units, vec![ContentUnit::new("Revelation", 22)]);

        let after = last_day.checked_add_days(Days::new(1)).unwrap();
        assert!(chapters_for_day(PlanType::Nt, start, 1, after).unwrap().is_empty());
    }

    #[test]
    fn test_partial_last_day() {
        // 260 chapters at 3/day: day 86 has chapters 258..260 -> 2 units.
        let start = date("2024-01-01");
        let day = start.checked_add_days(Days::new(86)).unwrap();
        let units = chapters_for_day(PlanType::Nt, start, 3, day).unwrap();
        assert_eq!(units, vec![ContentUnit::new("Revelation", 21), ContentUnit::new("Revelation", 22)]);
    }

    #[test]
    fn test_before_start_is_empty() {
        let units = chapters_for_day(PlanType::Ot, date("2024-01-10"), 1, date("2024-01-09")).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_chapters_for_day_rejects_mixed() {
        let result = chapters_for_day(PlanType::Mixed, date("2024-01-01"), 1, date("2024-01-01"));
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_mixed_example_day_zero() {
        let start = date("2024-01-01");
        let units = mixed_chapters_for_day(&MixedPace::new(2, 1, 1, 0), start, start);
        assert_eq!(
            units,
            vec![
                ContentUnit::new("Genesis", 1),
                ContentUnit::new("Genesis", 2),
                ContentUnit::new("Matthew", 1),
                ContentUnit::new("Psalms", 1),
            ]
        );
    }

    #[test]
    fn test_psalms_wraparound() {
        let start = date("2024-01-01");
        let pace = MixedPace::new(0, 0, 1, 0);

        let day_149 = start.checked_add_days(Days::new(149)).unwrap();
        assert_eq!(mixed_chapters_for_day(&pace, start, day_149), vec![ContentUnit::new("Psalms", 150)]);

        let day_150 = start.checked_add_days(Days::new(150)).unwrap();
        assert_eq!(mixed_chapters_for_day(&pace, start, day_150), vec![ContentUnit::new("Psalms", 1)]);
    }

    #[test]
    fn test_proverbs_wrap_within_day() {
        // Day 10 at 3/day starts at index 30: Proverbs 31, then 1, 2.
        let start = date("2024-01-01");
        let day = start.checked_add_days(Days::new(10)).unwrap();
        let units = mixed_chapters_for_day(&MixedPace::new(0, 0, 0, 3), start, day);
        assert_eq!(
            units,
            vec![ContentUnit::new("Proverbs", 31), ContentUnit::new("Proverbs", 1), ContentUnit::new("Proverbs", 2)]
        );
    }

    #[test]
    fn test_mixed_cyclical_never_runs_out() {
        let start = date("2024-01-01");
        let far = start.checked_add_days(Days::new(5000)).unwrap();
        let units = mixed_chapters_for_day(&MixedPace::new(1, 1, 2, 1), start, far);
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(|u| u.section == "Psalms" || u.section == "Proverbs"));
    }

    #[test]
    fn test_schedule_validation() {
        let start = date("2024-01-01");
        assert!(ReadingSchedule::new(PlanType::Nt, Pace::Uniform(1), start).is_ok());
        assert!(matches!(
            ReadingSchedule::new(PlanType::Nt, Pace::Uniform(0), start),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            ReadingSchedule::new(PlanType::Mixed, Pace::Uniform(2), start),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            ReadingSchedule::new(PlanType::Ot, Pace::Mixed(MixedPace::new(1, 1, 1, 1)), start),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            ReadingSchedule::new(PlanType::Mixed, Pace::Mixed(MixedPace::default()), start),
            Err(Error::BadRequest(_))
        ));
    }

    #[test]
    fn test_schedule_rejects_oversized_pace() {
        let start = date("2024-01-01");
        assert_eq!(MixedPace::new(u32::MAX, 1, 0, 0).total(), None);

        for pace in [
            Pace::Mixed(MixedPace::new(u32::MAX, 1, 0, 0)),
            Pace::Mixed(MixedPace::new(0, 0, 100_000_000, 0)),
            Pace::Mixed(MixedPace::new(600, 600, 0, 0)),
        ] {
            assert!(matches!(ReadingSchedule::new(PlanType::Mixed, pace, start), Err(Error::BadRequest(_))));
        }
        assert!(matches!(
            ReadingSchedule::new(PlanType::Nt, Pace::Uniform(MAX_DAILY_CHAPTERS + 1), start),
            Err(Error::BadRequest(_))
        ));

        assert!(ReadingSchedule::new(PlanType::Full, Pace::Uniform(MAX_DAILY_CHAPTERS), start).is_ok());
        let whole = MixedPace::new(748, 260, 150, 31);
        assert_eq!(whole.total(), Some(MAX_DAILY_CHAPTERS));
        assert!(ReadingSchedule::new(PlanType::Mixed, Pace::Mixed(whole), start).is_ok());
    }

    #[test]
    fn test_schedule_units_for_matches_free_functions() {
        let start = date("2024-02-01");
        let target = date("2024-02-20");

        let schedule = ReadingSchedule::new(PlanType::Full, Pace::Uniform(4), start).unwrap();
        assert_eq!(schedule.units_for(target), chapters_for_day(PlanType::Full, start, 4, target).unwrap());

        let pace = MixedPace::new(2, 1, 1, 1);
        let schedule = ReadingSchedule::new(PlanType::Mixed, Pace::Mixed(pace), start).unwrap();
        assert_eq!(schedule.units_for(target), mixed_chapters_for_day(&pace, start, target));
    }
}
