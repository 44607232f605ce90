use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sanrakshan_auth_types::identity::IdentityHeaders;
use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::entry::{EntryStatus, ItemCategory};
use sanrakshan_domain::id::EntryId;
use sanrakshan_domain::pagination::PageRequest;

use crate::domain::types::{NewItem, StorageEntry, StoredItem};
use crate::error::StorageServiceError;
use crate::state::AppState;
use crate::usecase::code::CodeGenerator;
use crate::usecase::entry::{
    CreateEntryInput, CreateEntryUseCase, GetEntryUseCase, ListEntriesUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ItemResponse {
    pub description: String,
    pub category: ItemCategory,
    pub quantity: u32,
}

impl From<StoredItem> for ItemResponse {
    fn from(item: StoredItem) -> Self {
        Self {
            description: item.description,
            category: item.category,
            quantity: item.quantity,
        }
    }
}

#[derive(Serialize)]
pub struct EntryResponse {
    pub id: EntryId,
    pub status: EntryStatus,
    pub notes: Option<String>,
    pub storage_location: Option<String>,
    #[serde(serialize_with = "sanrakshan_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "sanrakshan_core::serde::to_rfc3339_ms_opt")]
    pub claimed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<StorageEntry> for EntryResponse {
    fn from(entry: StorageEntry) -> Self {
        Self {
            id: entry.id,
            status: entry.status,
            notes: entry.notes,
            storage_location: entry.storage_location,
            created_at: entry.created_at,
            claimed_at: entry.claimed_at,
        }
    }
}

#[derive(Serialize)]
pub struct EntryDetailResponse {
    #[serde(flatten)]
    pub entry: EntryResponse,
    /// Present while the code is still active.
    pub code: Option<CodeValue>,
    pub items: Vec<ItemResponse>,
}

#[derive(Serialize)]
pub struct CreateEntryResponse {
    pub entry_id: EntryId,
    pub code: CodeValue,
    pub item_count: usize,
}

// ── POST /entries ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEntryRequest {
    pub items: Vec<NewItem>,
    pub notes: Option<String>,
    pub storage_location: Option<String>,
}

pub async fn create_entry(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<CreateEntryResponse>), StorageServiceError> {
    if identity.role.is_staff() {
        return Err(StorageServiceError::Forbidden);
    }

    let usecase = CreateEntryUseCase {
        generator: CodeGenerator {
            source: state.code_source(),
            codes: state.code_repo(),
        },
        entries: state.entry_repo(),
        profiles: state.profile_repo(),
    };
    let created = usecase
        .execute(CreateEntryInput {
            owner: identity.user_id,
            items: body.items,
            notes: body.notes,
            storage_location: body.storage_location,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateEntryResponse {
            entry_id: created.entry_id,
            code: created.code,
            item_count: created.item_count,
        }),
    ))
}

// ── GET /entries ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct EntryListQuery {
    pub status: Option<EntryStatus>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_entries(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<EntryResponse>>, StorageServiceError> {
    let defaults = PageRequest::default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(defaults.per_page),
        page: query.page.unwrap_or(defaults.page),
    };

    let usecase = ListEntriesUseCase {
        entries: state.entry_repo(),
    };
    let entries = usecase
        .execute(identity.user_id, query.status, page)
        .await?;
    Ok(Json(entries.into_iter().map(EntryResponse::from).collect()))
}

// ── GET /entries/{entry_id} ──────────────────────────────────────────────────

pub async fn get_entry(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
) -> Result<Json<EntryDetailResponse>, StorageServiceError> {
    let usecase = GetEntryUseCase {
        entries: state.entry_repo(),
        codes: state.code_repo(),
    };
    let view = usecase.execute(identity.user_id, EntryId(entry_id)).await?;

    Ok(Json(EntryDetailResponse {
        entry: view.entry.into(),
        code: view.code.filter(|c| c.is_active).map(|c| c.code),
        items: view.items.into_iter().map(ItemResponse::from).collect(),
    }))
}
