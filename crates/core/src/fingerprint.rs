//! Content fingerprints for conditional GETs.

use sha2::{Digest, Sha256};

/// Compute a strong entity tag for a response body.
///
/// The tag is the quoted hex SHA-256 of the body.
pub fn entity_tag(body: &[u8]) -> String {
    let digest = Sha256::digest(body);
    format!("\"{}\"", hex::encode(digest))
}

/// Whether an `If-None-Match` header value matches `tag`.
///
/// Accepts `*`, a single tag, or a comma-separated list. Weak
/// validators compare equal to their strong form.
pub fn matches_if_none_match(header: &str, tag: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == tag
    })
}
