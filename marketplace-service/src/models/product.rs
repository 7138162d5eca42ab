//! Product model.
//!
//! Stock is mutated only by the order workflow (conditional decrement);
//! catalog updates set every scalar field atomically.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Product entity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub unit: String,
    pub image_url: String,
    pub stock: i32,
    /// Discount percentage in [0, 100].
    pub discount: f64,
    pub seller_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Product row joined with its category name, for catalog listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductWithCategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub unit: String,
    pub image_url: String,
    pub stock: i32,
    pub discount: f64,
    pub seller_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub category_name: Option<String>,
}
