//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Upper bound on request bodies. Submissions are single small JSON objects.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/version", get(handlers::get_version))
        .route("/status", get(handlers::get_status))
        // Stored summaries
        .route(
            "/players",
            get(handlers::list_players).post(handlers::create_player),
        )
        .route(
            "/players/{id}",
            get(handlers::get_player).delete(handlers::delete_player),
        )
        // Match records
        .route(
            "/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/records/{id}",
            get(handlers::get_record).delete(handlers::delete_record),
        )
        // Aggregation and ranking
        .route("/summaries", get(handlers::list_summaries))
        .route("/summaries/refresh", post(handlers::refresh_summary))
        .route("/leaderboard", get(handlers::get_leaderboard))
        .route("/percentile", get(handlers::get_percentile))
        .route("/statistics/classes", get(handlers::get_class_statistics))
        .route(
            "/statistics/players/{name}",
            get(handlers::get_player_profile),
        )
        // Administration
        .route(
            "/admin/repair",
            get(handlers::diagnose).post(handlers::run_repair),
        )
        .route("/admin/clear", post(handlers::clear_data));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
