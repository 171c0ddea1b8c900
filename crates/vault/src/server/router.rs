//! Axum router construction.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use super::{handlers, middleware::RouterTimeoutExt, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route(
            "/records",
            post(handlers::create_record).get(handlers::list_records),
        )
        .route("/records/export", get(handlers::export_records))
        .route(
            "/records/:id",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_request_timeout(request_timeout)
        .layer(CompressionLayer::new())
        .with_state(state)
}
