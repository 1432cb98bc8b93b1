//! Static plan catalog.
//!
//! Sections never change at runtime. `full` is the old testament followed by
//! the new; that order fixes every chapter's global index.

use super::{ContentUnit, PlanType};

/// A named, ordered list of `(book, chapter count)` pairs.
#[derive(Debug, PartialEq, Eq)]
pub struct PlanSection {
    pub key: &'static str,
    pub books: &'static [(&'static str, u32)],
}

impl PlanSection {
    /// Total number of chapters in the section.
    pub fn total_units(&self) -> u32 {
        self.books.iter().map(|(_, count)| count).sum()
    }

    /// Every chapter of the section in reading order.
    pub fn flatten(&self) -> Vec<ContentUnit> {
        let mut units = Vec::with_capacity(self.total_units() as usize);
        for (book, count) in self.books {
            units.extend((1..=*count).map(|chapter| ContentUnit::new(*book, chapter)));
        }
        units
    }
}

pub static OLD_TESTAMENT: PlanSection = PlanSection {
    key: "ot",
    books: &[
        ("Genesis", 50),
        ("Exodus", 40),
        ("Leviticus", 27),
        ("Numbers", 36),
        ("Deuteronomy", 34),
        ("Joshua", 24),
        ("Judges", 21),
        ("Ruth", 4),
        ("1 Samuel", 31),
        ("2 Samuel", 24),
        ("1 Kings", 22),
        ("2 Kings", 25),
        ("1 Chronicles", 29),
        ("2 Chronicles", 36),
        ("Ezra", 10),
        ("Nehemiah", 13),
        ("Esther", 10),
        ("Job", 42),
        ("Ecclesiastes", 12),
        ("Song of Solomon", 8),
        ("Isaiah", 66),
        ("Jeremiah", 52),
        ("Lamentations", 5),
        ("Ezekiel", 48),
        ("Daniel", 12),
        ("Hosea", 14),
        ("Joel", 3),
        ("Amos", 9),
        ("Obadiah", 1),
        ("Jonah", 4),
        ("Micah", 7),
        ("Nahum", 3),
        ("Habakkuk", 3),
        ("Zephaniah", 3),
        ("Haggai", 2),
        ("Zechariah", 14),
        ("Malachi", 4),
    ],
};

pub static NEW_TESTAMENT: PlanSection = PlanSection {
    key: "nt",
    books: &[
        ("Matthew", 28),
        ("Mark", 16),
        ("Luke", 24),
        ("John", 21),
        ("Acts", 28),
        ("Romans", 16),
        ("1 Corinthians", 16),
        ("2 Corinthians", 13),
        ("Galatians", 6),
        ("Ephesians", 6),
        ("Philippians", 4),
        ("Colossians", 4),
        ("1 Thessalonians", 5),
        ("2 Thessalonians", 3),
        ("1 Timothy", 6),
        ("2 Timothy", 4),
        ("Titus", 3),
        ("Philemon", 1),
        ("Hebrews", 13),
        ("James", 5),
        ("1 Peter", 5),
        ("2 Peter", 3),
        ("1 John", 5),
        ("2 John", 1),
        ("3 John", 1),
        ("Jude", 1),
        ("Revelation", 22),
    ],
};

pub static PSALMS: PlanSection = PlanSection { key: "psalms", books: &[("Psalms", 150)] };

pub static PROVERBS: PlanSection = PlanSection { key: "proverbs", books: &[("Proverbs", 31)] };

/// Resolve a plan into its ordered sections.
///
/// `mixed` resolves to all four sections in category order; the scheduler
/// consumes them independently rather than as one list.
pub fn resolve(plan: PlanType) -> Vec<&'static PlanSection> {
    match plan {
        PlanType::Ot => vec![&OLD_TESTAMENT],
        PlanType::Nt => vec![&NEW_TESTAMENT],
        PlanType::Full => vec![&OLD_TESTAMENT, &NEW_TESTAMENT],
        PlanType::Psalms => vec![&PSALMS],
        PlanType::Proverbs => vec![&PROVERBS],
        PlanType::Mixed => vec![&OLD_TESTAMENT, &NEW_TESTAMENT, &PSALMS, &PROVERBS],
    }
}

/// Flatten the sections of a plan into one global reading order.
pub fn flatten(plan: PlanType) -> Vec<ContentUnit> {
    resolve(plan).into_iter().flat_map(PlanSection::flatten).collect()
}
