//! User model - seller and admin accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Seller,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Seller => "seller",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "seller" => Ok(UserRole::Seller),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Seller verification states.
///
/// `Pending` at registration; `Verified` via admin moderation or when every
/// KYC document reaches `approved`; `Rejected` only via admin moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Verified,
    Rejected,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Verified => "verified",
            UserStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UserStatus::Pending),
            "verified" => Ok(UserStatus::Verified),
            "rejected" => Ok(UserStatus::Rejected),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

/// User entity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub gst_no: Option<String>,
    pub shop_name: String,
    pub address: String,
    pub phone: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new seller account awaiting KYC verification.
    pub fn new_seller(
        name: String,
        email: String,
        gst_no: Option<String>,
        shop_name: String,
        address: String,
        phone: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            role: UserRole::Seller.as_str().to_string(),
            gst_no,
            shop_name,
            address,
            phone,
            status: UserStatus::Pending.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin.as_str()
    }
}

/// Seller row with pending/approved KYC document counts, for the admin
/// moderation queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SellerWithDocCounts {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gst_no: Option<String>,
    pub shop_name: String,
    pub address: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub pending_docs: i64,
    pub approved_docs: i64,
}
