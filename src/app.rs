use crate::handlers::{self, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Routes the search form talks to.
///
/// Returned without state so the caller can wrap them (e.g. with a rate limiter)
/// before handing them to [`build_router`].
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", post(handlers::search_records))
        .route("/export", post(handlers::export_records))
        .route("/schema", get(handlers::get_schema))
}

/// Assembles the full application: health check, API routes and shared layers.
///
/// `/health` is kept outside `api` so it bypasses whatever wraps the API routes.
pub fn build_router(state: Arc<AppState>, api: Router<Arc<AppState>>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        .merge(
            api.layer(
                ServiceBuilder::new()
                    // Replaces axum's fixed 2MB extractor limit with the configured one
                    .layer(DefaultBodyLimit::disable())
                    .layer(RequestBodyLimitLayer::new(max_body_bytes)),
            ),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
