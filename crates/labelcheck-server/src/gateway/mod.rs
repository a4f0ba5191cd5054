//! HTTP gateway (Axum) for label verification.
//!
//! This module is primarily used by the `labelcheck` server binary.

pub mod error;
pub mod handler;
pub mod mock_provider;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use handler::{verify_batch_handler, verify_handler};
pub use state::HandlerState;

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/verify", post(verify_handler))
        .route("/v1/verify/batch", post(verify_batch_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub provider_mode: &'static str,
    pub configured: bool,
    pub models: Vec<String>,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let configured = state.is_configured();
    let (status_code, status) = if configured {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unconfigured")
    };

    (
        status_code,
        Json(ReadyResponse {
            status,
            provider_mode: state.provider_mode(),
            configured,
            models: state.models.clone(),
        }),
    )
        .into_response()
}
