//! KYC document handlers: multipart upload, per-seller listing, and the
//! admin moderation queue.

use axum::{
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::AdminUser;
use crate::models::{DocumentStatus, DocumentType, KycDocument, PendingDocumentRow};
use crate::AppState;
use service_core::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: Uuid,
    pub document_url: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub document_id: Uuid,
    pub status: String,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Upload a KYC document.
///
/// POST /kyc/upload (multipart: userId, documentType, file)
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut user_id: Option<Uuid> = None;
    let mut document_type: Option<DocumentType> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        match field.name() {
            Some("userId") => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read userId: {}", e))
                })?;
                user_id = Some(value.parse().map_err(|_| {
                    AppError::BadRequest(anyhow::anyhow!("userId must be a UUID"))
                })?);
            }
            Some("documentType") => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read documentType: {}", e))
                })?;
                document_type = Some(
                    value
                        .parse()
                        .map_err(|e: String| AppError::BadRequest(anyhow::anyhow!(e)))?,
                );
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("document").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                    })?
                    .to_vec();
                file = Some((filename, data));
            }
            _ => {}
        }
    }

    let (user_id, document_type, (filename, data)) = match (user_id, document_type, file) {
        (Some(u), Some(t), Some(f)) => (u, t, f),
        _ => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Missing required fields"
            )))
        }
    };

    let doc = state
        .onboarding
        .submit_document(user_id, document_type, &filename, data)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id: doc.id,
            document_url: doc.document_url,
            message: "Document uploaded successfully".to_string(),
        }),
    ))
}

/// List a seller's documents.
///
/// GET /kyc/user/:user_id
pub async fn list_user_documents(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<KycDocument>>, AppError> {
    let documents = state.db.list_kyc_documents_for_user(user_id).await?;
    Ok(Json(documents))
}

/// List all pending documents with their owners, for moderation.
///
/// GET /kyc/pending
pub async fn list_pending_documents(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<PendingDocumentRow>>, AppError> {
    let documents = state.db.list_pending_kyc_documents().await?;
    Ok(Json(documents))
}

/// Approve or reject a document; may flip the owner to `verified`.
///
/// POST /kyc/verify
pub async fn verify_document(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let decision: DocumentStatus = req
        .status
        .parse()
        .map_err(|e: String| AppError::BadRequest(anyhow::anyhow!(e)))?;

    state
        .onboarding
        .moderate_document(req.document_id, decision, req.rejection_reason)
        .await?;

    Ok(Json(ActionResponse {
        success: true,
        message: format!("Document {}", decision.as_str()),
    }))
}
