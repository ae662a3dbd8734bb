//! buzzwall-wb library - Word Board service
//!
//! Collects buzzwords submitted from attendee phones and serves the live
//! set to the shared display, which polls on an interval. All state is
//! process memory; a restart is equivalent to a session reset.

use std::sync::Arc;

use axum::Router;
use chrono::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use buzzwall_common::config::Config;

pub mod api;
pub mod store;

use store::{RateLimiter, WordStore};

/// Application state shared across HTTP handlers
///
/// One instance per process, constructed in `main` and cloned into each
/// handler; clones share the underlying stores.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration
    pub config: Arc<Config>,
    /// Live buzzword store
    pub words: WordStore,
    /// Per-client submission rate limiter
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Create application state with stores sized from configuration
    pub fn new(config: Config) -> Self {
        let words = WordStore::new(
            config.max_words,
            Duration::seconds(config.word_ttl_secs as i64),
        );
        let rate_limiter = RateLimiter::new(
            config.rate_limit_max_requests,
            Duration::seconds(config.rate_limit_window_secs as i64),
        );

        Self {
            config: Arc::new(config),
            words,
            rate_limiter,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route(
            "/api/words",
            get(api::list_words)
                .post(api::submit_words)
                .delete(api::clear_words),
        )
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
