// handlers/public/system.rs - GET / and GET /health

use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// GET / - service name and version
pub async fn root() -> ApiResult<ServiceInfo> {
    Ok(ApiResponse::success(
        "Blog API is running.",
        ServiceInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
    ))
}

/// GET /health - 503 when the database does not answer
pub async fn health(State(state): State<AppState>) -> ApiResult<()> {
    state.database.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable.")
    })?;

    Ok(ApiResponse::message("OK"))
}
