use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Product category. Name is free text; no uniqueness is enforced.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, image_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            image_url,
            created_at: Utc::now(),
        }
    }
}
