/// Liveness and health check endpoints
///
/// # Endpoints
///
/// - `GET /api/` - Liveness: the process is up and serving
/// - `GET /api/health` - Health: includes a store connectivity probe
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Liveness response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    /// Human-readable service banner
    pub message: String,

    /// Application version
    pub version: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status: "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// Store status: "connected" or "disconnected"
    pub database: String,
}

/// Liveness handler
///
/// Always succeeds while the process is serving; touches nothing external.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "TextGrow API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check handler
///
/// Probes the store; a failed probe degrades the status rather than erroring
/// so monitors always get a well-formed body.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database_status = match state.store.ping().await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    Ok(Json(HealthResponse {
        status: if database_status == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_status.to_string(),
    }))
}
