//! Placeholder text used when every source misses.

use lectio_core::ContentUnit;

use crate::fetch::reader_links;

const READING_TIPS: &[&str] = &[
    "Read slowly and thoughtfully",
    "Look for key themes and applications",
    "Consider the historical context",
    "Pray for understanding and application",
];

const PRAYER: &str =
    "Lord, speak to me through Your Word today. Help me understand what You want to teach me through this passage. Amen.";

/// Deterministic stand-in text for `unit` pointing readers elsewhere.
pub fn placeholder_text(unit: &ContentUnit) -> String {
    let links = reader_links(unit)
        .into_iter()
        .map(|link| format!("• {}: {}", link.name, link.url))
        .collect::<Vec<_>>()
        .join("\n");
    let tips = READING_TIPS.iter().map(|tip| format!("• {tip}")).collect::<Vec<_>>().join("\n");

    format!(
        "{section} Chapter {index}\n\n\
         [Bible text temporarily unavailable - please read from your preferred Bible]\n\n\
         📖 Read online at:\n{links}\n\n\
         Today's Reading: {unit}\n\n\
         💡 Reading Tips:\n{tips}\n\n\
         🙏 Prayer: \"{PRAYER}\"",
        section = unit.section,
        index = unit.index,
    )
}
