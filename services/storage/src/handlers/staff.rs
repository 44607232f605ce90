use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use uuid::Uuid;

use sanrakshan_auth_types::identity::IdentityHeaders;
use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::id::{EntryId, UserId};
use sanrakshan_domain::pagination::PageRequest;

use crate::domain::types::{CodeScan, ScanAction};
use crate::error::StorageServiceError;
use crate::handlers::require_staff;
use crate::state::AppState;
use crate::usecase::entry::EntrySummaryUseCase;
use crate::usecase::scan::ListScansUseCase;

#[derive(Serialize)]
pub struct EntrySummaryResponse {
    pub active: u64,
    pub claimed: u64,
    pub expired: u64,
    pub total: u64,
}

#[derive(Serialize)]
pub struct ScanResponse {
    pub id: Uuid,
    pub code: CodeValue,
    pub entry_id: Option<EntryId>,
    pub scanned_by: UserId,
    pub action: ScanAction,
    pub is_valid: bool,
    #[serde(serialize_with = "sanrakshan_core::serde::to_rfc3339_ms")]
    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

impl From<CodeScan> for ScanResponse {
    fn from(scan: CodeScan) -> Self {
        Self {
            id: scan.id,
            is_valid: scan.action.is_valid(),
            code: scan.code,
            entry_id: scan.entry_id,
            scanned_by: scan.scanned_by,
            action: scan.action,
            scanned_at: scan.scanned_at,
        }
    }
}

// ── GET /staff/entries/summary ───────────────────────────────────────────────

pub async fn entry_summary(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<EntrySummaryResponse>, StorageServiceError> {
    require_staff(&identity)?;

    let usecase = EntrySummaryUseCase {
        entries: state.entry_repo(),
    };
    let summary = usecase.execute().await?;
    Ok(Json(EntrySummaryResponse {
        active: summary.active,
        claimed: summary.claimed,
        expired: summary.expired,
        total: summary.total(),
    }))
}

// ── GET /staff/scans ─────────────────────────────────────────────────────────

pub async fn list_scans(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ScanResponse>>, StorageServiceError> {
    require_staff(&identity)?;

    let usecase = ListScansUseCase {
        scans: state.scan_repo(),
    };
    let scans = usecase.execute(page).await?;
    Ok(Json(scans.into_iter().map(ScanResponse::from).collect()))
}
