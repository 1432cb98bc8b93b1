//! HTTP routes.

pub mod feed;
pub mod generate;
pub mod health;

use axum::Router;
use axum::http::{HeaderMap, header};
use axum::routing::get;
use lectio_core::AppConfig;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/generate", get(generate::generate))
        .route("/feed/:plan/:start/:pace/feed.rss", get(feed::feed))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Public base URL, always ending in `/`.
///
/// The configured site URL wins; otherwise the request's `Host` header.
pub(crate) fn base_url(config: &AppConfig, headers: &HeaderMap) -> String {
    if let Some(site) = config.site_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return format!("{}/", site.trim_end_matches('/'));
    }

    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{host}/"),
        None => format!("http://localhost:{}/", config.port),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use lectio_client::TextProvider;
    use lectio_core::{AppConfig, TextCache};

    use crate::state::AppState;

    /// State whose provider has no sources, so every unit gets its placeholder.
    pub fn offline_state() -> AppState {
        let config = AppConfig::default();
        let cache = Arc::new(TextCache::in_memory(config.cache_expiry(), config.cache_save_batch));
        let provider = TextProvider::new(cache.clone(), Vec::new());
        AppState::new(config, cache, provider)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    pub async fn body_string(body: Body) -> String {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
