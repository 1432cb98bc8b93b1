use axum::Json;
use axum::extract::State;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub cache_entries: usize,
    pub version: &'static str,
}

/// Liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        cache_entries: state.cache.len().await,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use crate::routes::create_router;
    use crate::routes::test_support::{body_string, get, offline_state};
    use axum::http::StatusCode;
    use lectio_core::{CacheKey, ContentUnit};
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let state = offline_state();
        state.cache.set(CacheKey::new(&ContentUnit::new("John", 3), "web"), "16. For God so loved".into()).await;

        let response = create_router(state).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response.into_body()).await).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["cache_entries"], 1);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["timestamp"].as_str().is_some_and(|t| t.ends_with('Z')));
    }
}
