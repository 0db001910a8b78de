//! Health check handler

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::state::ServiceInfo;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check(State(info): State<ServiceInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: info.name.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
