//! KYC document model.
//!
//! Every upload inserts a fresh row; re-submitting the same type never
//! overwrites. Documents outlive moderation decisions for audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Accepted KYC document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Gst,
    ShopLicense,
    Aadhaar,
    Pan,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Gst => "gst",
            DocumentType::ShopLicense => "shop_license",
            DocumentType::Aadhaar => "aadhaar",
            DocumentType::Pan => "pan",
            DocumentType::Other => "other",
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gst" => Ok(DocumentType::Gst),
            "shop_license" => Ok(DocumentType::ShopLicense),
            "aadhaar" => Ok(DocumentType::Aadhaar),
            "pan" => Ok(DocumentType::Pan),
            "other" => Ok(DocumentType::Other),
            _ => Err(format!("Invalid document type: {}", s)),
        }
    }
}

/// Moderation states for a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DocumentStatus::Pending),
            "approved" => Ok(DocumentStatus::Approved),
            "rejected" => Ok(DocumentStatus::Rejected),
            _ => Err(format!("Invalid document status: {}", s)),
        }
    }
}

/// KYC document entity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct KycDocument {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_type: String,
    pub document_url: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl KycDocument {
    /// Create a new document awaiting moderation.
    pub fn new(user_id: Uuid, document_type: DocumentType, document_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            document_type: document_type.as_str().to_string(),
            document_url,
            status: DocumentStatus::Pending.as_str().to_string(),
            rejection_reason: None,
            created_at: Utc::now(),
        }
    }
}

/// Pending document joined with its owner, for the admin moderation queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingDocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_type: String,
    pub document_url: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub shop_name: String,
}
