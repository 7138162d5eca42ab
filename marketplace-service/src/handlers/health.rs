use axum::{extract::State, Json};
use serde::Serialize;
use service_core::error::AppError;

use crate::AppState;

#[derive(Serialize)]
pub struct BannerResponse {
    pub message: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /
pub async fn root() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Marketplace API v1".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health - liveness plus a database ping.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.db.health_check().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
