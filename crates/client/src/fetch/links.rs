//! URL construction for text sources and external readers.

use lectio_core::ContentUnit;
use url::Url;
use url::form_urlencoded::{Serializer, byte_serialize};

const GATEWAY_READER: &str = "https://www.biblegateway.com/passage/";
const YOUVERSION_READER: &str = "https://www.bible.com/search/bible";
const BLUE_LETTER_READER: &str = "https://www.blueletterbible.org/search/search.cfm";

/// Version shown by external reader links.
const READER_VERSION: &str = "ESV";

/// Error type for source URL construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LinkError {
    #[error("empty base URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid base URL: {0}")]
    InvalidBase(String),
}

/// A named link to read a unit elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReaderLink {
    pub name: &'static str,
    pub url: String,
}

/// Parse a configured base URL.
///
/// Trims whitespace, requires http or https and drops any fragment.
fn parse_base(input: &str) -> Result<Url, LinkError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(LinkError::Empty);
    }

    let mut parsed = Url::parse(trimmed).map_err(|e| LinkError::InvalidBase(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(LinkError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Structured API request for one unit:
/// `?passage={section} {index}&type=json&formatting=plain`.
pub fn api_url(base: &str, unit: &ContentUnit) -> Result<Url, LinkError> {
    let mut url = parse_base(base)?;
    url.query_pairs_mut()
        .append_pair("passage", &unit.to_string())
        .append_pair("type", "json")
        .append_pair("formatting", "plain");
    Ok(url)
}

/// Printable markup page for one unit in `version`.
pub fn scrape_url(base: &str, unit: &ContentUnit, version: &str) -> Result<Url, LinkError> {
    let mut url = parse_base(base)?;
    url.query_pairs_mut()
        .append_pair("search", &unit.to_string())
        .append_pair("version", &version.to_uppercase())
        .append_pair("interface", "print");
    Ok(url)
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// Links to read `unit` on three external readers.
pub fn reader_links(unit: &ContentUnit) -> Vec<ReaderLink> {
    let passage = unit.to_string();
    vec![
        ReaderLink {
            name: "Bible Gateway",
            url: format!(
                "{GATEWAY_READER}?{}",
                Serializer::new(String::new())
                    .append_pair("search", &passage)
                    .append_pair("version", READER_VERSION)
                    .finish()
            ),
        },
        ReaderLink { name: "YouVersion", url: format!("{YOUVERSION_READER}?q={}", encode(&passage)) },
        ReaderLink { name: "Blue Letter Bible", url: format!("{BLUE_LETTER_READER}?Criteria={}", encode(&passage)) },
    ]
}

/// One reader link covering every unit of a day, passages separated by `;`.
pub fn passage_link(units: &[ContentUnit]) -> String {
    let passages = units.iter().map(ContentUnit::to_string).collect::<Vec<_>>().join(";");
    format!(
        "{GATEWAY_READER}?{}",
        Serializer::new(String::new())
            .append_pair("search", &passages)
            .append_pair("version", READER_VERSION)
            .finish()
    )
}
