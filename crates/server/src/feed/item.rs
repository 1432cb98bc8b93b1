//! Per-day item composition and channel metadata.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use lectio_client::{passage_link, placeholder_text};
use lectio_core::plan::elapsed_days;
use lectio_core::{ContentUnit, MixedPace, Pace, PlanType, ReadingSchedule};

use super::{Description, FeedItem};

/// Items are published at this hour (UTC) on their reading day.
const PUBLISH_HOUR: u32 = 6;

const REFLECTION_QUESTIONS: &[&str] = &[
    "What stands out to you in today's reading?",
    "How does this passage reveal God's character?",
    "What is one thing you can apply from this reading?",
    "How do these passages connect with each other?",
];

const CLOSING_PRAYER: &str =
    "Lord, thank you for Your Word. Help me understand and apply what I've read today. Amen.";

fn mixed_parts(pace: &MixedPace, labels: [&str; 4]) -> String {
    [pace.ot, pace.nt, pace.psalms, pace.proverbs]
        .into_iter()
        .zip(labels)
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{count} {label}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn channel_title(schedule: &ReadingSchedule) -> String {
    match schedule.pace() {
        Pace::Mixed(pace) => format!("Daily Bible Reading - Mixed Plan ({})", mixed_parts(&pace, ["OT", "NT", "Ps", "Pr"])),
        Pace::Uniform(n) => format!(
            "Daily Bible Reading - {} ({n} ch/day)",
            schedule.plan().as_str().to_uppercase()
        ),
    }
}

pub fn channel_description(schedule: &ReadingSchedule) -> String {
    match schedule.pace() {
        Pace::Mixed(pace) => format!(
            "Daily mixed Bible reading: {} per day",
            mixed_parts(&pace, ["Old Testament", "New Testament", "Psalm(s)", "Proverb(s)"])
        ),
        Pace::Uniform(n) => format!(
            "Complete Bible text for daily reading - {n} chapter{} per day",
            if n > 1 { "s" } else { "" }
        ),
    }
}

fn short_label(unit: &ContentUnit) -> String {
    match unit.section.as_str() {
        "Psalms" => format!("Ps {}", unit.index),
        "Proverbs" => format!("Pr {}", unit.index),
        _ => unit.to_string(),
    }
}

/// `Day N: <units> (Mon DD)`. A lone unit keeps its full name.
pub fn item_title(day_number: i64, date: NaiveDate, units: &[ContentUnit]) -> String {
    let summary = match units {
        [unit] => unit.to_string(),
        _ => units.iter().map(short_label).collect::<Vec<_>>().join(", "),
    };
    format!("Day {day_number}: {summary} ({})", date.format("%b %d"))
}

/// Stable id: a function of plan, date and pace only.
pub fn item_guid(schedule: &ReadingSchedule, date: NaiveDate) -> String {
    let day = date.format("%Y%m%d");
    match schedule.pace() {
        Pace::Mixed(p) => format!(
            "bible-mixed-{day}-{}ot-{}nt-{}ps-{}pr",
            p.ot, p.nt, p.psalms, p.proverbs
        ),
        Pace::Uniform(n) => format!("bible-{}-{day}-{n}ch", schedule.plan()),
    }
}

pub fn publish_at(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(PUBLISH_HOUR, 0, 0).map(|dt| dt.and_utc())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn heading(unit: &ContentUnit) -> String {
    match unit.section.as_str() {
        "Psalms" => format!("Psalm {}", unit.index),
        _ => unit.to_string(),
    }
}

/// Markup body: one block per unit followed by the reflection block.
pub fn item_body(units: &[ContentUnit], texts: &HashMap<ContentUnit, String>) -> String {
    let mut body = String::new();

    for unit in units {
        let text = texts.get(unit).cloned().unwrap_or_else(|| placeholder_text(unit));
        body.push_str(&format!(
            "<div style=\"margin-bottom: 30px;\">\n\
             <h2 style=\"color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px;\">📖 {heading}</h2>\n\
             <div style=\"line-height: 1.6; font-family: 'Georgia', serif; white-space: pre-wrap; margin: 15px 0;\">\n\
             {text}\n\
             </div>\n\
             </div>\n",
            heading = heading(unit),
            text = escape_html(&text),
        ));
    }

    let questions = REFLECTION_QUESTIONS
        .iter()
        .map(|q| format!("<li>{q}</li>"))
        .collect::<Vec<_>>()
        .join("\n");
    body.push_str(&format!(
        "<div style=\"background-color: #f8f9fa; padding: 15px; border-left: 4px solid #3498db; margin-top: 20px;\">\n\
         <h3 style=\"color: #2c3e50; margin-top: 0;\">📝 Reflection Questions</h3>\n\
         <ul style=\"line-height: 1.6;\">\n{questions}\n</ul>\n\
         <p style=\"margin-bottom: 0;\"><strong>🙏 Prayer:</strong> \"{CLOSING_PRAYER}\"</p>\n\
         </div>"
    ));

    body
}

/// The feed item for `units`, read on `date`.
pub fn day_item(
    schedule: &ReadingSchedule, date: NaiveDate, units: &[ContentUnit], texts: &HashMap<ContentUnit, String>,
) -> FeedItem {
    let day_number = elapsed_days(schedule.start(), date) + 1;
    FeedItem {
        title: item_title(day_number, date, units),
        link: Some(passage_link(units)),
        guid: item_guid(schedule, date),
        pub_date: publish_at(date),
        description: Description::Markup(item_body(units, texts)),
    }
}

/// Plan token and pace as shown in logs.
pub fn describe(plan: PlanType, pace: &Pace) -> String {
    match pace {
        Pace::Mixed(p) => format!("{plan} {}-{}-{}-{}", p.ot, p.nt, p.psalms, p.proverbs),
        Pace::Uniform(n) => format!("{plan} {n}/day"),
    }
}
