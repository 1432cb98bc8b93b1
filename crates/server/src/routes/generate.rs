//! `GET /generate` builds the subscription URL for a plan.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use chrono::Utc;
use lectio_core::PlanType;
use serde::{Deserialize, Serialize};

use super::base_url;
use super::feed::parse_pace;
use crate::error::WebError;
use crate::feed::parse_start;
use crate::state::AppState;

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default = "one")]
    pub chapters: u32,
    #[serde(default = "one")]
    pub ot_chapters: u32,
    #[serde(default = "one")]
    pub nt_chapters: u32,
    #[serde(default = "one")]
    pub psalm_chapters: u32,
    #[serde(default = "one")]
    pub proverb_chapters: u32,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub feed_url: String,
}

/// The pace path segment for `plan`.
pub fn pace_segment(params: &GenerateParams, plan: PlanType) -> String {
    match plan {
        PlanType::Mixed => format!(
            "{}-{}-{}-{}",
            params.ot_chapters, params.nt_chapters, params.psalm_chapters, params.proverb_chapters
        ),
        _ => params.chapters.to_string(),
    }
}

pub async fn generate(
    State(state): State<AppState>, headers: HeaderMap, Query(params): Query<GenerateParams>,
) -> Result<Json<GenerateResponse>, WebError> {
    let plan: PlanType = params
        .plan
        .as_deref()
        .unwrap_or("nt")
        .parse()
        .map_err(|e: lectio_core::Error| WebError::InvalidPlan(e.to_string()))?;

    let start = match params.start_date.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_start(raw).map_err(|e| WebError::InvalidDate(e.to_string()))?,
        None => Utc::now().date_naive(),
    };
    let start = start.format("%Y-%m-%d").to_string();

    let pace = pace_segment(&params, plan);
    parse_pace(plan.as_str(), &pace, state.config.max_pace)?;

    let feed_url = format!("{}feed/{plan}/{start}/{pace}/feed.rss", base_url(&state.config, &headers));
    tracing::debug!(%feed_url, "generated feed url");

    Ok(Json(GenerateResponse { feed_url }))
}
