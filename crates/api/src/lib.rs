pub mod error;
pub mod routes;
pub mod state;

use axum::{Router, extract::DefaultBodyLimit, routing::{get, post}};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the service router.
///
/// The audio body is a JSON array of f32 samples, which is large on the
/// wire (a minute of 16 kHz audio runs to tens of MB of JSON), so the
/// default body limit is raised well past it.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/transcribe", post(routes::transcription::transcribe))
        .route("/translate", post(routes::transcription::translate))
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
