use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{download_handlers, ops_handlers, upload_handlers};

pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.max_body_bytes).unwrap_or(usize::MAX);
    Router::new()
        .route("/upload", post(upload_handlers::upload_file))
        .route("/download/:filename", get(download_handlers::download_file))
        .route("/health/live", get(ops_handlers::health_live))
        .route("/health/ready", get(ops_handlers::health_ready))
        .route(
            "/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
