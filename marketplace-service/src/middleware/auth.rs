//! Bearer-token extractors.
//!
//! `AuthUser` validates the `Authorization: Bearer` JWT against the service
//! signing key; `AdminUser` additionally requires the `admin` role and gates
//! the moderation, catalog-mutation, and dashboard routes.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use service_core::error::AppError;

use crate::services::Claims;
use crate::AppState;

/// Authenticated caller with validated token claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// Authenticated caller holding the `admin` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("Authorization header must be a bearer token"))
        })?;

        let claims = state
            .jwt
            .validate_token(token)
            .map_err(AppError::Unauthorized)?;

        tracing::Span::current().record("user_id", claims.sub.as_str());

        Ok(AuthUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        if claims.role != "admin" {
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "Admin role required"
            )));
        }

        Ok(AdminUser(claims))
    }
}
