//! Feed assembly.
//!
//! Turns a plan, a start date and a pace into a feed document: resolve the
//! generation window, schedule each day until the plan runs out or the item
//! cap is reached, fetch every distinct unit once, flush the cache, then
//! compose one item per day. Any failure yields the one-item error
//! document instead.

pub mod item;
pub mod render;
pub mod window;

use chrono::{DateTime, NaiveDate, Utc};
use lectio_client::TextProvider;
use lectio_core::{ContentUnit, Error, Pace, PlanType, ReadingSchedule};

pub use render::render_rss;
pub use window::FeedWindow;

/// What a feed URL asks for, before validation.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub plan: String,
    pub start: String,
    pub pace: Pace,
}

/// Per-deployment feed parameters.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Maximum number of items in one feed.
    pub max_items: usize,
    /// Content version used for fetching and caching.
    pub version: String,
    /// Channel link.
    pub link: String,
}

/// An item description: literal markup or plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Markup(String),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: Option<String>,
    pub guid: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub description: Description,
}

#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub title: String,
    pub description: String,
    pub link: String,
    pub last_build: DateTime<Utc>,
    pub items: Vec<FeedItem>,
}

impl FeedDocument {
    /// Minimal one-item document describing `message`.
    pub fn error(message: &str, link: &str, now: DateTime<Utc>) -> Self {
        Self {
            title: "Bible RSS Feed - Error".into(),
            description: format!("Error generating feed: {message}"),
            link: link.to_string(),
            last_build: now,
            items: vec![FeedItem {
                title: "Feed Generation Error".into(),
                link: None,
                guid: format!("error-{}", now.format("%Y%m%d%H%M%S")),
                pub_date: None,
                description: Description::Text(format!(
                    "An error occurred while generating your Bible reading feed: {message}"
                )),
            }],
        }
    }

    pub fn is_error(&self) -> bool {
        self.items.len() == 1 && self.items[0].guid.starts_with("error-")
    }
}

/// Parse a `YYYY-MM-DD` start date.
pub fn parse_start(input: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| Error::BadRequest(format!("invalid start date '{input}': {e}")))
}

/// Dates and their units, stopping when the plan runs out or `max_items` is reached.
pub fn scheduled_days(
    schedule: &ReadingSchedule, window: &FeedWindow, max_items: usize,
) -> Vec<(NaiveDate, Vec<ContentUnit>)> {
    let mut days = Vec::new();
    for date in window.days() {
        if days.len() >= max_items {
            break;
        }
        let units = schedule.units_for(date);
        if units.is_empty() {
            break;
        }
        days.push((date, units));
    }
    days
}

async fn assemble(
    provider: &TextProvider, request: &FeedRequest, settings: &FeedSettings, now: DateTime<Utc>,
) -> Result<FeedDocument, Error> {
    let plan: PlanType = request.plan.parse()?;
    let start = parse_start(&request.start)?;
    let schedule = ReadingSchedule::new(plan, request.pace, start)?;
    let window = FeedWindow::new(start, now.date_naive())?;

    let days = scheduled_days(&schedule, &window, settings.max_items);
    let units: Vec<ContentUnit> = days.iter().flat_map(|(_, units)| units.iter().cloned()).collect();

    tracing::info!(
        plan = %item::describe(plan, &request.pace),
        first = %window.first,
        days = days.len(),
        units = units.len(),
        "assembling feed"
    );

    let texts = provider.get_many(&units, &settings.version).await;
    provider.cache().flush().await;

    let items = days
        .iter()
        .map(|(date, units)| item::day_item(&schedule, *date, units, &texts))
        .collect();

    Ok(FeedDocument {
        title: item::channel_title(&schedule),
        description: item::channel_description(&schedule),
        link: settings.link.clone(),
        last_build: now,
        items,
    })
}

/// Build the feed for `request` as seen at `now`. Never fails.
pub async fn build_feed(
    provider: &TextProvider, request: &FeedRequest, settings: &FeedSettings, now: DateTime<Utc>,
) -> FeedDocument {
    match assemble(provider, request, settings, now).await {
        Ok(document) => document,
        Err(e) => {
            tracing::error!(plan = %request.plan, start = %request.start, error = %e, "feed generation failed");
            FeedDocument::error(&e.to_string(), &settings.link, now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectio_core::{CacheKey, MixedPace, TextCache};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn settings() -> FeedSettings {
        FeedSettings { max_items: 22, version: "web".into(), link: "http://localhost:5000/".into() }
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    /// A provider with no sources: every unit resolves to its placeholder.
    fn offline_provider() -> TextProvider {
        TextProvider::new(Arc::new(TextCache::in_memory(chrono::Duration::days(30), 10)), Vec::new())
    }

    fn request(plan: &str, start: &str, pace: Pace) -> FeedRequest {
        FeedRequest { plan: plan.into(), start: start.into(), pace }
    }

    #[test]
    fn test_parse_start() {
        assert_eq!(parse_start("2026-01-31").unwrap(), NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
        assert!(matches!(parse_start("2026-02-30"), Err(Error::BadRequest(_))));
        assert!(matches!(parse_start("yesterday"), Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_future_start_begins_at_start() {
        let provider = offline_provider();
        let now = at("2026-03-01T12:00:00Z");
        let doc = build_feed(&provider, &request("nt", "2026-03-10", Pace::Uniform(1)), &settings(), now).await;

        assert!(!doc.is_error());
        assert_eq!(doc.items.len(), 6);
        assert_eq!(doc.items[0].title, "Day 1: Matthew 1 (Mar 10)");
        assert_eq!(doc.items[0].guid, "bible-nt-20260310-1ch");
    }

    #[tokio::test]
    async fn test_running_plan_shows_last_week() {
        let provider = offline_provider();
        let now = at("2026-03-01T12:00:00Z");
        let doc = build_feed(&provider, &request("nt", "2026-01-01", Pace::Uniform(1)), &settings(), now).await;

        assert_eq!(doc.items.len(), 22);
        // 2026-02-22 is 52 days after the start.
        assert!(doc.items[0].title.starts_with("Day 53: "));
        assert!(doc.items[0].title.ends_with("(Feb 22)"));
    }

    #[tokio::test]
    async fn test_max_items_caps_the_window() {
        let provider = offline_provider();
        let now = at("2026-03-01T12:00:00Z");
        let settings = FeedSettings { max_items: 5, ..settings() };
        let doc = build_feed(&provider, &request("ot", "2026-01-01", Pace::Uniform(3)), &settings, now).await;

        assert_eq!(doc.items.len(), 5);
    }

    #[tokio::test]
    async fn test_exhausted_plan_stops_early() {
        let provider = offline_provider();
        // 31 proverbs at one per day: the last is read on 2026-01-31.
        let now = at("2026-01-30T08:00:00Z");
        let doc = build_feed(&provider, &request("proverbs", "2026-01-01", Pace::Uniform(1)), &settings(), now).await;

        assert_eq!(doc.items.len(), 9);
        assert_eq!(doc.items.last().unwrap().title, "Day 31: Proverbs 31 (Jan 31)");
    }

    #[tokio::test]
    async fn test_mixed_plan_never_runs_out_of_psalms() {
        let provider = offline_provider();
        let now = at("2027-06-01T00:00:00Z");
        let pace = Pace::Mixed(MixedPace::new(0, 0, 1, 1));
        let doc = build_feed(&provider, &request("mixed", "2026-01-01", pace), &settings(), now).await;

        assert_eq!(doc.items.len(), 22);
        assert_eq!(doc.title, "Daily Bible Reading - Mixed Plan (1 Ps, 1 Pr)");
        assert!(doc.items.iter().all(|item| item.guid.ends_with("-0ot-0nt-1ps-1pr")));
    }

    #[tokio::test]
    async fn test_guids_are_stable_across_builds() {
        let provider = offline_provider();
        let req = request("full", "2026-02-01", Pace::Uniform(4));

        let first = build_feed(&provider, &req, &settings(), at("2026-03-01T12:00:00Z")).await;
        let later = build_feed(&provider, &req, &settings(), at("2026-03-04T07:30:00Z")).await;

        let by_date = |doc: &FeedDocument| {
            doc.items
                .iter()
                .map(|i| (i.pub_date, i.guid.clone()))
                .collect::<HashMap<_, _>>()
        };
        let (first, later) = (by_date(&first), by_date(&later));

        let shared: Vec<_> = first.keys().filter(|date| later.contains_key(*date)).collect();
        assert_eq!(shared.len(), 19);
        for date in shared {
            assert_eq!(first[date], later[date]);
        }
    }

    #[tokio::test]
    async fn test_offline_feed_uses_placeholders() {
        let provider = offline_provider();
        let pace = Pace::Mixed(MixedPace::new(1, 1, 1, 1));
        let doc = build_feed(&provider, &request("mixed", "2026-02-20", pace), &settings(), at("2026-03-01T12:00:00Z")).await;

        assert!(!doc.is_error());
        assert_eq!(doc.items.len(), 22);
        for item in &doc.items {
            let Description::Markup(body) = &item.description else {
                panic!("{} has a plain-text body", item.title);
            };
            assert_eq!(body.matches("[Bible text temporarily unavailable").count(), 4, "{}", item.title);
        }
    }

    #[tokio::test]
    async fn test_units_are_cached_once() {
        let cache = Arc::new(TextCache::in_memory(chrono::Duration::days(30), 10));
        let provider = TextProvider::new(cache.clone(), Vec::new());
        let now = at("2026-01-01T00:00:00Z");
        let pace = Pace::Mixed(MixedPace::new(0, 0, 0, 1));
        let settings = FeedSettings { max_items: 22, ..settings() };

        build_feed(&provider, &request("mixed", "2026-01-01", pace), &settings, now).await;

        // 15 days of proverbs, one each.
        assert_eq!(cache.len().await, 15);
        assert!(cache.get(&CacheKey::new(&ContentUnit::new("Proverbs", 15), "web")).await.is_some());
    }

    #[tokio::test]
    async fn test_errors_yield_error_document() {
        let provider = offline_provider();
        let now = at("2026-03-01T12:34:56Z");

        for req in [
            request("apocrypha", "2026-01-01", Pace::Uniform(1)),
            request("nt", "not-a-date", Pace::Uniform(1)),
            request("nt", "2026-01-01", Pace::Uniform(0)),
            request("mixed", "2026-01-01", Pace::Mixed(MixedPace::default())),
        ] {
            let doc = build_feed(&provider, &req, &settings(), now).await;
            assert!(doc.is_error(), "expected error document for {req:?}");
            assert_eq!(doc.title, "Bible RSS Feed - Error");
            assert_eq!(doc.items[0].guid, "error-20260301123456");
        }
    }
}
