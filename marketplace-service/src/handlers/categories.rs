//! Category CRUD. Mutations are admin-only.

use axum::extract::{Json, Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::AdminUser;
use crate::models::Category;
use crate::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /categories
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.db.list_categories().await?;
    Ok(Json(categories))
}

/// GET /categories/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>, AppError> {
    let category = state
        .db
        .find_category_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Category not found")))?;
    Ok(Json(category))
}

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    let category = Category::new(payload.name, payload.image_url);
    state.db.insert_category(&category).await?;
    Ok(Json(category))
}

/// PUT /categories/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    let rows = state
        .db
        .update_category(id, &payload.name, &payload.image_url)
        .await?;
    if rows == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Category not found")));
    }

    let category = state
        .db
        .find_category_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Category not found")))?;
    Ok(Json(category))
}

/// DELETE /categories/:id
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.db.delete_category(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
