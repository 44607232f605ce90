use chrono::{DateTime, Utc};
use uuid::Uuid;

use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::entry::EntryStatus;
use sanrakshan_domain::id::{EntryId, UserId};
use sanrakshan_domain::pagination::PageRequest;

use crate::domain::repository::{CodeRepository, CodeSource, EntryRepository, ProfileRepository};
use crate::domain::types::{
    MAX_CODE_ATTEMPTS, MAX_ITEM_DESCRIPTION_LEN, MAX_ITEM_QUANTITY, MAX_ITEMS_PER_ENTRY,
    NewEntry, NewItem, StatusSummary, StorageEntry, StoredItem, ValidationCode,
};
use crate::error::StorageServiceError;
use crate::usecase::code::CodeGenerator;

const MAX_NOTES_LEN: usize = 1000;
const MAX_LOCATION_LEN: usize = 100;

/// Trim descriptions and check count, length and quantity.
fn validate_items(items: Vec<NewItem>) -> Result<Vec<NewItem>, StorageServiceError> {
    if items.is_empty() {
        return Err(StorageServiceError::EmptyEntry);
    }
    if items.len() > MAX_ITEMS_PER_ENTRY {
        return Err(StorageServiceError::TooManyItems);
    }
    items
        .into_iter()
        .map(|item| {
            let description = item.description.trim();
            if description.is_empty() {
                return Err(StorageServiceError::InvalidItem(
                    "description must not be blank".to_owned(),
                ));
            }
            if description.chars().count() > MAX_ITEM_DESCRIPTION_LEN {
                return Err(StorageServiceError::InvalidItem(format!(
                    "description must be at most {MAX_ITEM_DESCRIPTION_LEN} characters"
                )));
            }
            if item.quantity == 0 {
                return Err(StorageServiceError::InvalidItem(
                    "quantity must be at least 1".to_owned(),
                ));
            }
            if item.quantity > MAX_ITEM_QUANTITY {
                return Err(StorageServiceError::InvalidItem(format!(
                    "quantity must be at most {MAX_ITEM_QUANTITY}"
                )));
            }
            Ok(NewItem {
                description: description.to_owned(),
                ..item
            })
        })
        .collect()
}

fn clean_text(
    value: Option<String>,
    field: &str,
    max: usize,
) -> Result<Option<String>, StorageServiceError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(StorageServiceError::InvalidItem(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(Some(trimmed.to_owned()))
}

fn build_entry(
    owner: UserId,
    items: &[NewItem],
    notes: Option<String>,
    storage_location: Option<String>,
    code: CodeValue,
    now: DateTime<Utc>,
) -> NewEntry {
    let entry_id = EntryId::new();
    NewEntry {
        entry: StorageEntry {
            id: entry_id,
            owner_id: owner,
            status: EntryStatus::Active,
            notes,
            storage_location,
            created_at: now,
            updated_at: now,
            claimed_at: None,
            claimed_by: None,
        },
        items: items
            .iter()
            .map(|item| StoredItem {
                id: Uuid::now_v7(),
                entry_id,
                description: item.description.clone(),
                category: item.category,
                quantity: item.quantity,
                created_at: now,
            })
            .collect(),
        code: ValidationCode {
            id: Uuid::now_v7(),
            entry_id,
            code,
            is_active: true,
            created_at: now,
            deactivated_at: None,
        },
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateEntryInput {
    pub owner: UserId,
    pub items: Vec<NewItem>,
    pub notes: Option<String>,
    pub storage_location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedEntry {
    pub entry_id: EntryId,
    pub code: CodeValue,
    pub item_count: usize,
}

pub struct CreateEntryUseCase<S, C, E, P>
where
    S: CodeSource,
    C: CodeRepository,
    E: EntryRepository,
    P: ProfileRepository,
{
    pub generator: CodeGenerator<S, C>,
    pub entries: E,
    pub profiles: P,
}

impl<S, C, E, P> CreateEntryUseCase<S, C, E, P>
where
    S: CodeSource,
    C: CodeRepository,
    E: EntryRepository,
    P: ProfileRepository,
{
    pub async fn execute(&self, input: CreateEntryInput) -> Result<CreatedEntry, StorageServiceError> {
        // 1. Validate before touching storage
        let items = validate_items(input.items)?;
        let notes = clean_text(input.notes, "notes", MAX_NOTES_LEN)?;
        let location = clean_text(input.storage_location, "storage location", MAX_LOCATION_LEN)?;

        // 2. Only students with a profile may store items
        self.profiles
            .find_by_user(input.owner)
            .await?
            .ok_or(StorageServiceError::ProfileNotFound)?;

        // 3. Insert with a fresh code; an insert-time collision spends from the same budget
        let mut remaining = MAX_CODE_ATTEMPTS;
        while remaining > 0 {
            let (code, drawn) = self.generator.generate_within(remaining).await?;
            remaining -= drawn;

            let new = build_entry(
                input.owner,
                &items,
                notes.clone(),
                location.clone(),
                code,
                Utc::now(),
            );
            match self.entries.create(&new).await {
                Ok(()) => {
                    tracing::info!(
                        entry_id = %new.entry.id,
                        owner_id = %input.owner,
                        item_count = new.items.len(),
                        "storage entry created"
                    );
                    return Ok(CreatedEntry {
                        entry_id: new.entry.id,
                        code: new.code.code,
                        item_count: new.items.len(),
                    });
                }
                Err(StorageServiceError::CodeCollision) => {
                    tracing::warn!(remaining, "validation code taken at insert, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(StorageServiceError::GenerationExhausted)
    }
}

// ── List / get (owner views) ─────────────────────────────────────────────────

pub struct ListEntriesUseCase<E: EntryRepository> {
    pub entries: E,
}

impl<E: EntryRepository> ListEntriesUseCase<E> {
    pub async fn execute(
        &self,
        owner: UserId,
        status: Option<EntryStatus>,
        page: PageRequest,
    ) -> Result<Vec<StorageEntry>, StorageServiceError> {
        self.entries
            .list_by_owner(owner, status, page.clamped())
            .await
    }
}

#[derive(Debug, Clone)]
pub struct EntryView {
    pub entry: StorageEntry,
    pub items: Vec<StoredItem>,
    pub code: Option<ValidationCode>,
}

pub struct GetEntryUseCase<E, C>
where
    E: EntryRepository,
    C: CodeRepository,
{
    pub entries: E,
    pub codes: C,
}

impl<E, C> GetEntryUseCase<E, C>
where
    E: EntryRepository,
    C: CodeRepository,
{
    /// Entries of other accounts are reported as not found.
    pub async fn execute(
        &self,
        owner: UserId,
        entry_id: EntryId,
    ) -> Result<EntryView, StorageServiceError> {
        let entry = self
            .entries
            .find_by_id(entry_id)
            .await?
            .filter(|e| e.owner_id == owner)
            .ok_or(StorageServiceError::EntryNotFound)?;
        let items = self.entries.items(entry_id).await?;
        let code = self.codes.find_by_entry(entry_id).await?;
        Ok(EntryView { entry, items, code })
    }
}

// ── Expiry ───────────────────────────────────────────────────────────────────

pub struct ExpireStaleUseCase<E: EntryRepository> {
    pub entries: E,
}

impl<E: EntryRepository> ExpireStaleUseCase<E> {
    /// Expire every active entry created before `cutoff`.
    pub async fn execute(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageServiceError> {
        let expired = self.entries.expire_stale(cutoff).await?;
        if expired > 0 {
            tracing::info!(expired, %cutoff, "expired stale storage entries");
        }
        Ok(expired)
    }
}

pub struct PurgeExpiredUseCase<E: EntryRepository> {
    pub entries: E,
}

impl<E: EntryRepository> PurgeExpiredUseCase<E> {
    /// Delete expired entries (with items and code) last touched before `before`.
    pub async fn execute(&self, before: DateTime<Utc>) -> Result<u64, StorageServiceError> {
        let purged = self.entries.purge_expired(before).await?;
        if purged > 0 {
            tracing::info!(purged, %before, "purged expired storage entries");
        }
        Ok(purged)
    }
}

// ── Staff summary ────────────────────────────────────────────────────────────

pub struct EntrySummaryUseCase<E: EntryRepository> {
    pub entries: E,
}

impl<E: EntryRepository> EntrySummaryUseCase<E> {
    pub async fn execute(&self) -> Result<StatusSummary, StorageServiceError> {
        self.entries.count_by_status().await
    }
}
