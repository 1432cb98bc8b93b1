//! Markup text source.
//!
//! Locates the passage region of a printable page, drops footnote and
//! cross-reference markers and keeps the paragraph text. When the preferred
//! region is missing, a few broader selectors are tried and the first one
//! with a plausible amount of text wins.

use std::time::Duration;

use async_trait::async_trait;
use lectio_core::{ContentUnit, Error};
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};

use super::TextSource;
use crate::fetch::{FetchClient, scrape_url};

const PRIMARY_REGION: &str = "div.passage-text";
const FALLBACK_REGIONS: &[&str] = &[".passage-content", ".passage", ".text"];

/// Fallback regions shorter than this are page furniture, not a chapter.
const MIN_FALLBACK_CHARS: usize = 100;

const STRIPPED_TAGS: &[&str] = &["sup", "div"];
const STRIPPED_CLASSES: &[&str] = &["footnote", "crossreference"];

fn is_stripped(element: &Element) -> bool {
    STRIPPED_TAGS.contains(&element.name()) && element.classes().any(|c| STRIPPED_CLASSES.contains(&c))
}

/// Text under `element`, skipping anything inside a stripped marker below `root`.
fn visible_text(element: ElementRef<'_>, root: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_stripped(ancestor.value()));
        if !hidden {
            out.push_str(text);
        }
    }
    out
}

fn primary_passage(document: &Html) -> Option<String> {
    let region_selector = Selector::parse(PRIMARY_REGION).ok()?;
    let paragraph_selector = Selector::parse("p").ok()?;
    let region = document.select(&region_selector).next()?;

    let paragraphs: Vec<String> = region
        .select(&paragraph_selector)
        .map(|p| visible_text(p, region).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() { None } else { Some(paragraphs.join("\n\n")) }
}

fn fallback_passage(document: &Html) -> Option<String> {
    FALLBACK_REGIONS.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        let region = document.select(&selector).next()?;
        let text = region.text().collect::<String>().trim().to_string();
        (text.chars().count() > MIN_FALLBACK_CHARS).then_some(text)
    })
}

/// Extract chapter text from a printable passage page.
///
/// Paragraphs are separated by a blank line. Returns `None` when neither
/// the passage region nor any fallback region yields usable text.
pub fn extract_passage(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    primary_passage(&document).or_else(|| fallback_passage(&document))
}

/// Text source backed by a printable markup page.
#[derive(Debug, Clone)]
pub struct ScrapeSource {
    client: FetchClient,
    base_url: String,
    timeout: Duration,
}

impl ScrapeSource {
    pub fn new(client: FetchClient, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self { client, base_url: base_url.into(), timeout }
    }
}

#[async_trait]
impl TextSource for ScrapeSource {
    fn name(&self) -> &'static str {
        "scrape"
    }

    async fn fetch(&self, unit: &ContentUnit, version: &str) -> Result<String, Error> {
        let url = scrape_url(&self.base_url, unit, version).map_err(|e| Error::HttpError(e.to_string()))?;
        let response = self
            .client
            .get(&url, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8", self.timeout)
            .await?;

        extract_passage(&response.text()).ok_or_else(|| Error::FetchMiss(format!("no passage text for {unit}")))
    }
}
