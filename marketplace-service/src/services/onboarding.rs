//! Seller onboarding: KYC document submission, moderation, and the
//! aggregate verification rule.
//!
//! A seller becomes `verified` exactly when every submitted document is
//! `approved` (and at least one exists). Rejecting a single document never
//! flips the seller to `rejected`; only direct seller moderation does that.

use std::sync::Arc;

use service_core::error::AppError;
use uuid::Uuid;

use crate::models::{DocumentStatus, DocumentType, KycDocument, UserStatus};
use crate::services::{Database, Storage};

/// True when the aggregate document set verifies the seller.
pub fn all_documents_approved(approved_count: i64, total_count: i64) -> bool {
    total_count > 0 && approved_count == total_count
}

/// Storage key for an uploaded document. The timestamp keeps re-uploads of
/// the same type from colliding.
pub fn kyc_object_key(
    user_id: Uuid,
    document_type: DocumentType,
    unix_millis: i64,
    filename: &str,
) -> String {
    format!(
        "kyc/{}/{}-{}-{}",
        user_id,
        document_type.as_str(),
        unix_millis,
        filename
    )
}

#[derive(Clone)]
pub struct OnboardingService {
    db: Database,
    storage: Arc<dyn Storage>,
    public_base_url: String,
}

impl OnboardingService {
    pub fn new(db: Database, storage: Arc<dyn Storage>, public_base_url: String) -> Self {
        Self {
            db,
            storage,
            public_base_url,
        }
    }

    /// Store an uploaded document and record it as pending moderation.
    ///
    /// Every call inserts a fresh row; multiple pending documents of the
    /// same type may coexist.
    pub async fn submit_document(
        &self,
        user_id: Uuid,
        document_type: DocumentType,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<KycDocument, AppError> {
        self.db
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

        let key = kyc_object_key(
            user_id,
            document_type,
            chrono::Utc::now().timestamp_millis(),
            filename,
        );
        self.storage.upload(&key, data).await?;

        let url = format!("{}/{}", self.public_base_url.trim_end_matches('/'), key);
        let doc = KycDocument::new(user_id, document_type, url);
        self.db.insert_kyc_document(&doc).await?;

        tracing::info!(
            document_id = %doc.id,
            user_id = %user_id,
            document_type = document_type.as_str(),
            "KYC document submitted"
        );

        Ok(doc)
    }

    /// Approve or reject a single document, then recompute the owner's
    /// aggregate verification status. Runs in one transaction so a failed
    /// recompute leaves the document untouched.
    pub async fn moderate_document(
        &self,
        document_id: Uuid,
        decision: DocumentStatus,
        rejection_reason: Option<String>,
    ) -> Result<(), AppError> {
        if decision == DocumentStatus::Pending {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Decision must be approved or rejected"
            )));
        }

        let mut tx = self.db.pool().begin().await.map_err(AppError::from)?;

        let doc = sqlx::query_as::<_, KycDocument>("SELECT * FROM kyc_documents WHERE id = $1")
            .bind(document_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document not found")))?;

        let reason = if decision == DocumentStatus::Rejected {
            rejection_reason
        } else {
            None
        };

        sqlx::query("UPDATE kyc_documents SET status = $1, rejection_reason = $2 WHERE id = $3")
            .bind(decision.as_str())
            .bind(&reason)
            .bind(document_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        let (approved_count, total_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'approved'), COUNT(*)
            FROM kyc_documents WHERE user_id = $1
            "#,
        )
        .bind(doc.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        if all_documents_approved(approved_count, total_count) {
            sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
                .bind(UserStatus::Verified.as_str())
                .bind(doc.user_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::from)?;

            tracing::info!(user_id = %doc.user_id, "Seller verified via KYC aggregate");
        }

        tx.commit().await.map_err(AppError::from)?;

        tracing::info!(
            document_id = %document_id,
            decision = decision.as_str(),
            "KYC document moderated"
        );

        Ok(())
    }

    /// Directly set a seller's verification status.
    ///
    /// Rejection cascades over the seller's pending documents only;
    /// already-approved documents stay approved.
    pub async fn moderate_seller(
        &self,
        user_id: Uuid,
        decision: UserStatus,
        rejection_reason: Option<String>,
    ) -> Result<(), AppError> {
        if decision == UserStatus::Pending {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Decision must be verified or rejected"
            )));
        }

        let mut tx = self.db.pool().begin().await.map_err(AppError::from)?;

        let updated = sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
            .bind(decision.as_str())
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
        }

        if decision == UserStatus::Rejected {
            let cascaded = sqlx::query(
                r#"
                UPDATE kyc_documents
                SET status = 'rejected', rejection_reason = $1
                WHERE user_id = $2 AND status = 'pending'
                "#,
            )
            .bind(&rejection_reason)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

            tracing::info!(
                user_id = %user_id,
                documents = cascaded.rows_affected(),
                "Pending documents rejected with seller"
            );
        }

        tx.commit().await.map_err(AppError::from)?;

        tracing::info!(
            user_id = %user_id,
            decision = decision.as_str(),
            "Seller moderated"
        );

        Ok(())
    }
}
