//! # REST API for Health Checks

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use shared::SystemInfo;
use tracing::info;

use super::errors::ApiError;
use super::json_egress::{write_json, Envelope};
use crate::backend::AppState;

/// Service version reported by the health check
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /v1/healthz
pub async fn healthcheck(State(state): State<AppState>) -> Result<Response, ApiError> {
    info!("GET /v1/healthz");

    let system_info = SystemInfo {
        environment: state.environment.to_string(),
        version: VERSION.to_string(),
    };
    let envelope = Envelope::new()
        .with("status", "available")
        .with("system_info", &system_info);

    Ok(write_json(StatusCode::OK, envelope, HeaderMap::new())?)
}
