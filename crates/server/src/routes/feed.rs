//! `GET /feed/{plan}/{start}/{pace}/feed.rss`
//!
//! The mixed plan takes `{ot}-{nt}-{psalms}-{proverbs}` in the pace segment.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use lectio_core::fingerprint::{entity_tag, matches_if_none_match};
use lectio_core::{MixedPace, Pace, PlanType};

use super::base_url;
use crate::error::WebError;
use crate::feed::{FeedDocument, FeedRequest, FeedSettings, build_feed, render_rss};
use crate::state::AppState;

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
pub const CACHE_POLICY: &str = "public, max-age=3600";

fn count(segment: &str, part: &str, max_pace: u32) -> Result<u32, WebError> {
    let n: u32 = part
        .parse()
        .map_err(|_| WebError::InvalidPace(format!("'{segment}' is not a chapter count")))?;
    if n > max_pace {
        return Err(WebError::InvalidPace(format!("'{segment}' exceeds {max_pace} chapters per day")));
    }
    Ok(n)
}

/// Read the pace segment for `plan`, allowing at most `max_pace` chapters a day.
pub fn parse_pace(plan: &str, segment: &str, max_pace: u32) -> Result<Pace, WebError> {
    if plan != PlanType::Mixed.as_str() {
        return count(segment, segment, max_pace).map(Pace::Uniform);
    }

    let parts: Vec<&str> = segment.split('-').collect();
    let [ot, nt, psalms, proverbs] = parts.as_slice() else {
        return Err(WebError::InvalidPace(format!(
            "'{segment}' is not ot-nt-psalms-proverbs"
        )));
    };

    let pace = MixedPace::new(
        count(segment, ot, max_pace)?,
        count(segment, nt, max_pace)?,
        count(segment, psalms, max_pace)?,
        count(segment, proverbs, max_pace)?,
    );
    match pace.total() {
        Some(total) if total <= max_pace => Ok(Pace::Mixed(pace)),
        _ => Err(WebError::InvalidPace(format!("'{segment}' exceeds {max_pace} chapters per day"))),
    }
}

/// Tag of the document without its build timestamp.
fn document_tag(document: &FeedDocument) -> String {
    let stable = FeedDocument { last_build: DateTime::<Utc>::UNIX_EPOCH, ..document.clone() };
    entity_tag(render_rss(&stable).as_bytes())
}

pub async fn feed(
    State(state): State<AppState>, Path((plan, start, pace)): Path<(String, String, String)>, headers: HeaderMap,
) -> Result<Response, WebError> {
    let pace = parse_pace(&plan, &pace, state.config.max_pace)?;

    let settings = FeedSettings {
        max_items: state.config.max_days_to_generate,
        version: state.config.default_version.clone(),
        link: base_url(&state.config, &headers),
    };
    let request = FeedRequest { plan, start, pace };

    let document = build_feed(&state.provider, &request, &settings, Utc::now()).await;
    let etag = document_tag(&document);
    tracing::info!(
        plan = %request.plan,
        items = document.items.len(),
        error = document.is_error(),
        "feed built"
    );

    let fresh = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| matches_if_none_match(v, &etag));
    if fresh {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, etag.as_str()), (header::CACHE_CONTROL, CACHE_POLICY)],
        )
            .into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, RSS_CONTENT_TYPE),
            (header::CACHE_CONTROL, CACHE_POLICY),
            (header::ETAG, etag.as_str()),
        ],
        render_rss(&document),
    )
        .into_response())
}
