//! Authentication handlers: seller registration, login, user lookup.
//!
//! Login issues a signed JWT. There is no credential verification - the
//! platform stores no password material; the token is what downstream
//! admin authorization checks.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::User;
use crate::AppState;
use service_core::error::AppError;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Seller registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub gst_no: Option<String>,
    #[validate(length(min = 1))]
    pub shop_name: String,
    #[validate(length(min = 1))]
    pub address: String,
    pub phone: Option<String>,
}

/// Login request. The password field is accepted for contract compatibility
/// but not verified.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[allow(dead_code)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub message: String,
}

/// User fields exposed on login.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub shop_name: String,
    pub gst_no: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.clone(),
            status: u.status.clone(),
            shop_name: u.shop_name.clone(),
            gst_no: u.gst_no.clone(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new seller (status `pending` until KYC verification).
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    req.validate()?;

    if state.db.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Email already registered"
        )));
    }

    let user = User::new_seller(
        req.name,
        req.email,
        req.gst_no,
        req.shop_name,
        req.address,
        req.phone,
    );
    state.db.insert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Seller registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            message: "Registration successful. Please upload KYC documents.".to_string(),
        }),
    ))
}

/// Login by email and receive a signed session token.
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .db
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    let token = state
        .jwt
        .generate_token(&user.id.to_string(), &user.email, &user.role)
        .map_err(AppError::InternalError)?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(&user),
        token,
    }))
}

/// Fetch a user record by id.
///
/// GET /auth/user/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    Ok(Json(user))
}
