//! Professional verification documents

use serde_json::json;
use tracing::info;

use crate::common::{Actor, AppError, AppResult, Capability, DocumentId, ProfileId};
use crate::domains::admin::models::AdminAction;
use crate::domains::notifications::{kinds, notify};
use crate::domains::profiles::models::{DocumentStatus, ProfessionalDocument, Role};
use crate::kernel::ServerDeps;

/// Accepted document types.
pub const DOCUMENT_TYPES: &[&str] = &[
    "government_id",
    "address_proof",
    "trade_certificate",
    "police_verification",
];

/// Register an uploaded document for review. The client uploads the file to
/// object storage first and passes its key.
pub async fn submit_document(
    profile_id: ProfileId,
    role: Role,
    document_type: &str,
    storage_key: &str,
    deps: &ServerDeps,
) -> AppResult<ProfessionalDocument> {
    Actor::new(profile_id, role)
        .has_role(Role::Professional)
        .check(deps)
        .await?;

    let document_type = document_type.trim();
    if !DOCUMENT_TYPES.contains(&document_type) {
        return Err(AppError::validation(format!(
            "Unknown document type. Expected one of: {}",
            DOCUMENT_TYPES.join(", ")
        )));
    }
    let storage_key = storage_key.trim();
    if storage_key.is_empty() || storage_key.len() > 512 {
        return Err(AppError::validation("Invalid storage key"));
    }

    let document =
        ProfessionalDocument::create(profile_id, document_type, storage_key, &deps.db_pool).await?;
    info!(document_id = %document.id, profile_id = %profile_id, document_type, "Document submitted");
    Ok(document)
}

pub async fn my_documents(
    profile_id: ProfileId,
    deps: &ServerDeps,
) -> AppResult<Vec<ProfessionalDocument>> {
    Ok(ProfessionalDocument::find_for_professional(profile_id, &deps.db_pool).await?)
}

pub async fn pending_documents(
    admin_id: ProfileId,
    admin_role: Role,
    deps: &ServerDeps,
) -> AppResult<Vec<ProfessionalDocument>> {
    Actor::new(admin_id, admin_role)
        .can(Capability::VerifyDocuments)
        .check(deps)
        .await?;

    Ok(ProfessionalDocument::find_pending(&deps.db_pool).await?)
}

pub async fn review_document(
    admin_id: ProfileId,
    admin_role: Role,
    document_id: DocumentId,
    approve: bool,
    notes: Option<String>,
    deps: &ServerDeps,
) -> AppResult<ProfessionalDocument> {
    Actor::new(admin_id, admin_role)
        .can(Capability::VerifyDocuments)
        .check(deps)
        .await?;

    let status = if approve {
        DocumentStatus::Approved
    } else {
        DocumentStatus::Rejected
    };
    let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    if !approve && notes.is_none() {
        return Err(AppError::validation("A reason is required when rejecting a document"));
    }

    let document = match ProfessionalDocument::review(
        document_id,
        status,
        admin_id,
        notes.as_deref(),
        &deps.db_pool,
    )
    .await?
    {
        Some(doc) => doc,
        None => {
            return match ProfessionalDocument::find_by_id(document_id, &deps.db_pool).await? {
                Some(_) => Err(AppError::conflict("Document has already been reviewed")),
                None => Err(AppError::NotFound("Document")),
            }
        }
    };

    AdminAction::record(
        admin_id,
        if approve { "approve_document" } else { "reject_document" },
        "professional_document",
        Some(document_id.into_uuid()),
        json!({ "professional_id": document.professional_id, "notes": notes }),
        &deps.db_pool,
    )
    .await?;

    let body = match (&status, &document.review_notes) {
        (DocumentStatus::Approved, _) => format!("Your {} was approved.", document.document_type),
        (_, Some(reason)) => format!("Your {} was rejected: {}", document.document_type, reason),
        _ => format!("Your {} was rejected.", document.document_type),
    };
    notify(
        document.professional_id,
        kinds::DOCUMENT_REVIEWED,
        "Document reviewed",
        &body,
        deps,
    )
    .await;

    Ok(document)
}
