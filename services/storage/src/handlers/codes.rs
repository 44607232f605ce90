use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use sanrakshan_auth_types::identity::IdentityHeaders;
use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::entry::EntryStatus;
use sanrakshan_domain::id::{EntryId, UserId};

use crate::domain::types::{EntryDetails, OwnerSummary, VerifyOutcome};
use crate::error::StorageServiceError;
use crate::handlers::entries::ItemResponse;
use crate::handlers::require_staff;
use crate::state::AppState;
use crate::usecase::claim::{ClaimCodeUseCase, ClaimInput};
use crate::usecase::verify::VerifyCodeUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct VerifiedEntryResponse {
    pub entry_id: EntryId,
    pub code: CodeValue,
    pub status: EntryStatus,
    pub can_claim: bool,
    pub notes: Option<String>,
    pub storage_location: Option<String>,
    #[serde(serialize_with = "sanrakshan_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub owner: OwnerSummary,
    pub items: Vec<ItemResponse>,
}

impl From<EntryDetails> for VerifiedEntryResponse {
    fn from(details: EntryDetails) -> Self {
        Self {
            entry_id: details.entry.id,
            code: details.code,
            status: details.entry.status,
            can_claim: details.can_claim,
            notes: details.entry.notes,
            storage_location: details.entry.storage_location,
            created_at: details.entry.created_at,
            owner: details.owner,
            items: details.items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VerifyResponse {
    Active(Box<VerifiedEntryResponse>),
    NotFound,
    Inactive {
        #[serde(serialize_with = "sanrakshan_core::serde::to_rfc3339_ms_opt")]
        claimed_at: Option<chrono::DateTime<chrono::Utc>>,
    },
}

#[derive(Serialize)]
pub struct ClaimResponse {
    pub entry_id: EntryId,
    pub code: CodeValue,
    #[serde(serialize_with = "sanrakshan_core::serde::to_rfc3339_ms")]
    pub claimed_at: chrono::DateTime<chrono::Utc>,
    pub claimed_by: UserId,
    pub item_count: usize,
}

// ── GET /codes/{code} ────────────────────────────────────────────────────────

pub async fn verify_code(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<(StatusCode, Json<VerifyResponse>), StorageServiceError> {
    let staff = require_staff(&identity)?;

    let usecase = VerifyCodeUseCase {
        codes: state.code_repo(),
        entries: state.entry_repo(),
        accounts: state.account_repo(),
        profiles: state.profile_repo(),
        scans: state.scan_repo(),
    };
    let (status, body) = match usecase.execute(staff, &code).await? {
        VerifyOutcome::Verified(details) => (
            StatusCode::OK,
            VerifyResponse::Active(Box::new((*details).into())),
        ),
        VerifyOutcome::NotFound => (StatusCode::NOT_FOUND, VerifyResponse::NotFound),
        VerifyOutcome::Inactive { claimed_at, .. } => {
            (StatusCode::GONE, VerifyResponse::Inactive { claimed_at })
        }
    };
    Ok((status, Json(body)))
}

// ── POST /codes/{code}/claim ─────────────────────────────────────────────────

pub async fn claim_code(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ClaimResponse>, StorageServiceError> {
    let staff = require_staff(&identity)?;

    let usecase = ClaimCodeUseCase {
        codes: state.code_repo(),
        entries: state.entry_repo(),
        scans: state.scan_repo(),
    };
    let receipt = usecase.execute(ClaimInput { code, staff }).await?;

    Ok(Json(ClaimResponse {
        entry_id: receipt.entry_id,
        code: receipt.code,
        claimed_at: receipt.claimed_at,
        claimed_by: receipt.claimed_by,
        item_count: receipt.item_count,
    }))
}
