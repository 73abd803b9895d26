//! HTTP surface for the engine
//!
//! A thin axum layer over [`Engine::produce_report`]. The handlers own no
//! state beyond the shared engine; persistence, identity, and billing are
//! external collaborators.

use crate::engine::{Engine, EngineVersion, WireReport};
use crate::errors::EngineError;
use crate::intake::RawIntake;
use axum::{
    extract::Extension,
    http::HeaderValue,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the report router with current and versioned aliases plus health
/// endpoints.
pub fn build_report_router(engine: Arc<Engine>) -> Router {
    Router::new()
        // current endpoints
        .route("/api/report", post(produce_report))
        // versioned aliases
        .route("/v1/report", post(produce_report))
        // health and version endpoints
        .route("/healthz", get(healthz))
        .route("/version", get(version))
        .layer(Extension(engine))
}

/// CORS layer from the configured origin list. An empty list permits any
/// origin, matching the development posture of the intake frontend.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[axum::debug_handler]
async fn produce_report(
    Extension(engine): Extension<Arc<Engine>>,
    Json(raw): Json<RawIntake>,
) -> Result<Json<WireReport>, EngineError> {
    let report = engine.produce_report(&raw)?;
    Ok(Json(report.wire()))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn version() -> Json<EngineVersion> {
    Json(EngineVersion::current())
}
