use axum::{
    http::Method,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{health, pages, stats};
use crate::api::state::AppState;

/// Builds the application router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    // Any origin, but only the four verbs the API uses
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        // Front end
        .route("/", get(pages::index))
        // Health check
        .route("/health", get(health::health_check))
        // Stats routes
        .route("/add", post(stats::add_stats))
        .route("/view-team/:team/:year", get(stats::view_team))
        .route("/update", put(stats::update_stats))
        .route("/delete", delete(stats::delete_stats))
        .route("/view", get(stats::view_stats))
        .route("/top-teams", get(stats::top_teams))
        .route("/average-goals", get(stats::average_goals))
        .route("/available-years", get(stats::available_years))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
