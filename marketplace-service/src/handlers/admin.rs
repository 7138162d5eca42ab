//! Admin endpoints: seller listings, direct seller moderation, and the
//! dashboard counters. Every route here requires an admin token.

use axum::extract::{Json, Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::AdminUser;
use crate::models::{SellerWithDocCounts, User, UserStatus};
use crate::services::DashboardStats;
use crate::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SellerListParams {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySellerRequest {
    pub user_id: Uuid,
    pub status: String,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// GET /admin/sellers?status=
pub async fn list_sellers(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<SellerListParams>,
) -> Result<Json<Vec<User>>, AppError> {
    if let Some(status) = params.status.as_deref() {
        status
            .parse::<UserStatus>()
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e)))?;
    }
    let sellers = state.db.list_sellers(params.status.as_deref()).await?;
    Ok(Json(sellers))
}

/// GET /admin/pending-sellers - sellers awaiting verification with their
/// document counts.
pub async fn list_pending_sellers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<SellerWithDocCounts>>, AppError> {
    let sellers = state.db.list_pending_sellers().await?;
    Ok(Json(sellers))
}

/// Directly verify or reject a seller. Rejection cascades over the seller's
/// pending documents.
///
/// POST /admin/verify-seller
pub async fn verify_seller(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<VerifySellerRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let decision: UserStatus = req
        .status
        .parse()
        .map_err(|e: String| AppError::BadRequest(anyhow::anyhow!(e)))?;

    state
        .onboarding
        .moderate_seller(req.user_id, decision, req.rejection_reason)
        .await?;

    Ok(Json(ActionResponse {
        success: true,
        message: format!("Seller {}", decision.as_str()),
    }))
}

/// GET /admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = state.db.dashboard_stats().await?;
    Ok(Json(stats))
}
