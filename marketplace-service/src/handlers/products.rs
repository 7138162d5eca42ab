//! Product CRUD and image upload. Mutations are admin-only; stock is only
//! ever decremented by the order workflow, never through these handlers'
//! partial knowledge of it (updates set the full scalar field set).

use axum::extract::{Json, Multipart, Path, Query, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::middleware::AdminUser;
use crate::models::{Product, ProductWithCategory};
use crate::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub category_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub category_id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub unit: String,
    pub image_url: String,
    #[validate(range(min = 0))]
    pub stock: i32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: f64,
    pub seller_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /products?categoryId=&sellerId=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProductWithCategory>>, AppError> {
    let products = state
        .db
        .list_products(params.category_id, params.seller_id)
        .await?;
    Ok(Json(products))
}

/// GET /products/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .db
        .find_product_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;
    Ok(Json(product))
}

/// POST /products
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate()?;

    state
        .db
        .find_category_by_id(payload.category_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!(
                "Category {} not found",
                payload.category_id
            ))
        })?;

    let product = Product {
        id: Uuid::new_v4(),
        category_id: payload.category_id,
        name: payload.name,
        description: payload.description,
        price: payload.price,
        unit: payload.unit,
        image_url: payload.image_url,
        stock: payload.stock,
        discount: payload.discount,
        seller_id: payload.seller_id,
        created_at: Utc::now(),
    };
    state.db.insert_product(&product).await?;

    Ok(Json(product))
}

/// PUT /products/:id - sets every scalar field atomically.
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate()?;

    state
        .db
        .find_category_by_id(payload.category_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!(
                "Category {} not found",
                payload.category_id
            ))
        })?;

    let rows = state
        .db
        .update_product(
            id,
            payload.category_id,
            &payload.name,
            &payload.description,
            payload.price,
            &payload.unit,
            &payload.image_url,
            payload.stock,
            payload.discount,
        )
        .await?;
    if rows == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Product not found")));
    }

    let product = state
        .db
        .find_product_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;
    Ok(Json(product))
}

/// DELETE /products/:id
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.db.delete_product(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// POST /products/upload-image (multipart: file)
pub async fn upload_image(
    State(state): State<AppState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<ImageUploadResponse>, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
        })?
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file provided")))?;

    let filename = field.file_name().unwrap_or("image").to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e)))?
        .to_vec();

    let key = format!("products/{}-{}", Utc::now().timestamp_millis(), filename);
    state.storage.upload(&key, data).await?;

    let image_url = format!(
        "{}/{}",
        state.config.storage.public_base_url.trim_end_matches('/'),
        key
    );

    Ok(Json(ImageUploadResponse { image_url }))
}
