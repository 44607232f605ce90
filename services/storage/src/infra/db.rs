use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError,
    TransactionTrait,
};
use uuid::Uuid;

use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::entry::EntryStatus;
use sanrakshan_domain::id::{EntryId, UserId};
use sanrakshan_domain::pagination::PageRequest;
use sanrakshan_domain::user::UserRole;
use sanrakshan_storage_schema::{
    code_scans, outbox_events, password_reset_codes, storage_entries, stored_items,
    student_profiles, users, validation_codes,
};

use crate::domain::repository::{
    AccountRepository, CodeRepository, EntryRepository, OutboxRepository,
    PasswordResetRepository, ProfileRepository, ScanRepository,
};
use crate::domain::types::{
    Account, ClaimOutcome, CodeScan, NewEntry, OutboxEvent, PasswordResetCode,
    PendingOutboxEvent, StatusSummary, StorageEntry, StoredItem, StudentProfile, ValidationCode,
};
use crate::error::StorageServiceError;

fn is_unique_violation(err: &TransactionError<DbErr>) -> bool {
    let db_err = match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    };
    matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── Entry repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEntryRepository {
    pub db: DatabaseConnection,
}

impl EntryRepository for DbEntryRepository {
    async fn create(&self, new: &NewEntry) -> Result<(), StorageServiceError> {
        let items = new
            .items
            .iter()
            .map(item_to_active_model)
            .collect::<Result<Vec<_>, _>>()?;
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                let new = new.clone();
                Box::pin(async move {
                    entry_to_active_model(&new.entry).insert(txn).await?;
                    stored_items::Entity::insert_many(items).exec(txn).await?;
                    code_to_active_model(&new.code).insert(txn).await?;
                    Ok(())
                })
            })
            .await;
        match result {
            Err(e) if is_unique_violation(&e) => Err(StorageServiceError::CodeCollision),
            other => {
                other.context("create storage entry")?;
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<StorageEntry>, StorageServiceError> {
        let model = storage_entries::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find storage entry by id")?;
        model.map(entry_from_model).transpose()
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        status: Option<EntryStatus>,
        page: PageRequest,
    ) -> Result<Vec<StorageEntry>, StorageServiceError> {
        let mut query = storage_entries::Entity::find()
            .filter(storage_entries::Column::OwnerId.eq(owner.0));
        if let Some(status) = status {
            query = query.filter(storage_entries::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(storage_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list storage entries by owner")?;
        models.into_iter().map(entry_from_model).collect()
    }

    async fn items(&self, entry_id: EntryId) -> Result<Vec<StoredItem>, StorageServiceError> {
        let models = stored_items::Entity::find()
            .filter(stored_items::Column::EntryId.eq(entry_id.0))
            .order_by_asc(stored_items::Column::Description)
            .all(&self.db)
            .await
            .context("list stored items")?;
        models.into_iter().map(item_from_model).collect()
    }

    async fn count_by_status(&self) -> Result<StatusSummary, StorageServiceError> {
        let rows: Vec<(String, i64)> = storage_entries::Entity::find()
            .select_only()
            .column(storage_entries::Column::Status)
            .column_as(Expr::col(storage_entries::Column::Id).count(), "count")
            .group_by(storage_entries::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count storage entries by status")?;

        let mut summary = StatusSummary::default();
        for (status, count) in rows {
            let count = u64::try_from(count).unwrap_or_default();
            match status.parse::<EntryStatus>() {
                Ok(EntryStatus::Active) => summary.active = count,
                Ok(EntryStatus::Claimed) => summary.claimed = count,
                Ok(EntryStatus::Expired) => summary.expired = count,
                Err(e) => tracing::warn!(error = %e, "skipping unknown entry status"),
            }
        }
        Ok(summary)
    }

    async fn expire_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageServiceError> {
        let result = storage_entries::Entity::update_many()
            .col_expr(
                storage_entries::Column::Status,
                Expr::value(EntryStatus::Expired.as_str()),
            )
            .col_expr(storage_entries::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(storage_entries::Column::Status.eq(EntryStatus::Active.as_str()))
            .filter(storage_entries::Column::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .context("expire stale storage entries")?;
        Ok(result.rows_affected)
    }

    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64, StorageServiceError> {
        // Items and codes go with the entry (ON DELETE CASCADE).
        let result = storage_entries::Entity::delete_many()
            .filter(storage_entries::Column::Status.eq(EntryStatus::Expired.as_str()))
            .filter(storage_entries::Column::UpdatedAt.lt(before))
            .exec(&self.db)
            .await
            .context("purge expired storage entries")?;
        Ok(result.rows_affected)
    }
}

fn entry_to_active_model(entry: &StorageEntry) -> storage_entries::ActiveModel {
    storage_entries::ActiveModel {
        id: Set(entry.id.0),
        owner_id: Set(entry.owner_id.0),
        status: Set(entry.status.as_str().to_owned()),
        notes: Set(entry.notes.clone()),
        storage_location: Set(entry.storage_location.clone()),
        created_at: Set(entry.created_at),
        updated_at: Set(entry.updated_at),
        claimed_at: Set(entry.claimed_at),
        claimed_by: Set(entry.claimed_by.map(|id| id.0)),
    }
}

fn item_to_active_model(item: &StoredItem) -> Result<stored_items::ActiveModel, StorageServiceError> {
    let quantity = i32::try_from(item.quantity)
        .with_context(|| format!("stored item {} quantity {}", item.id, item.quantity))?;
    Ok(stored_items::ActiveModel {
        id: Set(item.id),
        entry_id: Set(item.entry_id.0),
        description: Set(item.description.clone()),
        category: Set(item.category.as_str().to_owned()),
        quantity: Set(quantity),
        created_at: Set(item.created_at),
    })
}

fn code_to_active_model(code: &ValidationCode) -> validation_codes::ActiveModel {
    validation_codes::ActiveModel {
        id: Set(code.id),
        entry_id: Set(code.entry_id.0),
        code: Set(code.code.as_str().to_owned()),
        is_active: Set(code.is_active),
        created_at: Set(code.created_at),
        deactivated_at: Set(code.deactivated_at),
    }
}

fn entry_from_model(model: storage_entries::Model) -> Result<StorageEntry, StorageServiceError> {
    let status = model
        .status
        .parse()
        .with_context(|| format!("storage entry {} status", model.id))?;
    Ok(StorageEntry {
        id: EntryId(model.id),
        owner_id: UserId(model.owner_id),
        status,
        notes: model.notes,
        storage_location: model.storage_location,
        created_at: model.created_at,
        updated_at: model.updated_at,
        claimed_at: model.claimed_at,
        claimed_by: model.claimed_by.map(UserId),
    })
}

fn item_from_model(model: stored_items::Model) -> Result<StoredItem, StorageServiceError> {
    let category = model
        .category
        .parse()
        .with_context(|| format!("stored item {} category", model.id))?;
    let quantity = u32::try_from(model.quantity)
        .with_context(|| format!("stored item {} quantity", model.id))?;
    Ok(StoredItem {
        id: model.id,
        entry_id: EntryId(model.entry_id),
        description: model.description,
        category,
        quantity,
        created_at: model.created_at,
    })
}

fn code_from_model(model: validation_codes::Model) -> Result<ValidationCode, StorageServiceError> {
    let code = CodeValue::parse(&model.code)
        .with_context(|| format!("validation code {} value", model.id))?;
    Ok(ValidationCode {
        id: model.id,
        entry_id: EntryId(model.entry_id),
        code,
        is_active: model.is_active,
        created_at: model.created_at,
        deactivated_at: model.deactivated_at,
    })
}

// ── Code repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCodeRepository {
    pub db: DatabaseConnection,
}

impl CodeRepository for DbCodeRepository {
    async fn is_active(&self, code: &CodeValue) -> Result<bool, StorageServiceError> {
        let count = validation_codes::Entity::find()
            .filter(validation_codes::Column::Code.eq(code.as_str()))
            .filter(validation_codes::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .context("check active validation code")?;
        Ok(count > 0)
    }

    async fn find_by_value(
        &self,
        code: &CodeValue,
    ) -> Result<Option<ValidationCode>, StorageServiceError> {
        let model = validation_codes::Entity::find()
            .filter(validation_codes::Column::Code.eq(code.as_str()))
            .order_by_desc(validation_codes::Column::IsActive)
            .order_by_desc(validation_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find validation code by value")?;
        model.map(code_from_model).transpose()
    }

    async fn find_by_entry(
        &self,
        entry_id: EntryId,
    ) -> Result<Option<ValidationCode>, StorageServiceError> {
        let model = validation_codes::Entity::find()
            .filter(validation_codes::Column::EntryId.eq(entry_id.0))
            .one(&self.db)
            .await
            .context("find validation code by entry")?;
        model.map(code_from_model).transpose()
    }

    async fn claim(
        &self,
        code_id: Uuid,
        entry_id: EntryId,
        staff: UserId,
        at: DateTime<Utc>,
    ) -> Result<ClaimOutcome, StorageServiceError> {
        let txn = self.db.begin().await.context("begin claim")?;

        // A concurrent claim blocks on the row lock, then sees is_active = false.
        let deactivated = validation_codes::Entity::update_many()
            .col_expr(validation_codes::Column::IsActive, Expr::value(false))
            .col_expr(validation_codes::Column::DeactivatedAt, Expr::value(at))
            .filter(validation_codes::Column::Id.eq(code_id))
            .filter(validation_codes::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .context("deactivate validation code")?;
        if deactivated.rows_affected == 0 {
            txn.rollback().await.context("rollback claim")?;
            return Ok(ClaimOutcome::CodeInactive);
        }

        let claimed = storage_entries::Entity::update_many()
            .col_expr(
                storage_entries::Column::Status,
                Expr::value(EntryStatus::Claimed.as_str()),
            )
            .col_expr(storage_entries::Column::ClaimedAt, Expr::value(at))
            .col_expr(storage_entries::Column::ClaimedBy, Expr::value(staff.0))
            .col_expr(storage_entries::Column::UpdatedAt, Expr::value(at))
            .filter(storage_entries::Column::Id.eq(entry_id.0))
            .filter(storage_entries::Column::Status.eq(EntryStatus::Active.as_str()))
            .exec(&txn)
            .await
            .context("mark storage entry claimed")?;
        if claimed.rows_affected == 0 {
            let current = storage_entries::Entity::find_by_id(entry_id.0)
                .one(&txn)
                .await
                .context("load unclaimable storage entry")?
                .with_context(|| format!("storage entry {entry_id} missing during claim"))?;
            txn.rollback().await.context("rollback claim")?;
            let status = entry_from_model(current)?.status;
            return Ok(ClaimOutcome::EntryNotActive(status));
        }

        txn.commit().await.context("commit claim")?;
        Ok(ClaimOutcome::Claimed)
    }
}

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Account>, StorageServiceError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find account by id")?;
        model.map(account_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find account by email")?;
        model.map(account_from_model).transpose()
    }

    async fn create_with_profile(
        &self,
        account: &Account,
        profile: &StudentProfile,
    ) -> Result<(), StorageServiceError> {
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                let account = account.clone();
                let profile = profile.clone();
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(account.id.0),
                        username: Set(account.username),
                        email: Set(account.email),
                        first_name: Set(account.first_name),
                        last_name: Set(account.last_name),
                        password_hash: Set(account.password_hash),
                        role: Set(i16::from(account.role.as_u8())),
                        created_at: Set(account.created_at),
                        updated_at: Set(account.updated_at),
                    }
                    .insert(txn)
                    .await?;
                    student_profiles::ActiveModel {
                        id: Set(profile.id),
                        user_id: Set(profile.user_id.0),
                        roll_number: Set(profile.roll_number),
                        department: Set(profile.department.as_str().to_owned()),
                        year: Set(i16::from(profile.year)),
                        phone: Set(profile.phone),
                        hostel_room: Set(profile.hostel_room),
                        created_at: Set(profile.created_at),
                        updated_at: Set(profile.updated_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await;
        match result {
            Err(e) if is_unique_violation(&e) => Err(StorageServiceError::AccountAlreadyExists),
            other => {
                other.context("create account with profile")?;
                Ok(())
            }
        }
    }
}

fn account_from_model(model: users::Model) -> Result<Account, StorageServiceError> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(UserRole::from_u8)
        .with_context(|| format!("account {} has unknown role {}", model.id, model.role))?;
    Ok(Account {
        id: UserId(model.id),
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: model.password_hash,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<StudentProfile>, StorageServiceError> {
        let model = student_profiles::Entity::find()
            .filter(student_profiles::Column::UserId.eq(user_id.0))
            .one(&self.db)
            .await
            .context("find student profile by user")?;
        model.map(profile_from_model).transpose()
    }
}

fn profile_from_model(
    model: student_profiles::Model,
) -> Result<StudentProfile, StorageServiceError> {
    let department = model
        .department
        .parse()
        .with_context(|| format!("student profile {} department", model.id))?;
    let year = u8::try_from(model.year)
        .with_context(|| format!("student profile {} year {}", model.id, model.year))?;
    Ok(StudentProfile {
        id: model.id,
        user_id: UserId(model.user_id),
        roll_number: model.roll_number,
        department,
        year,
        phone: model.phone,
        hostel_room: model.hostel_room,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Password reset repository ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPasswordResetRepository {
    pub db: DatabaseConnection,
}

impl PasswordResetRepository for DbPasswordResetRepository {
    async fn count_active(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageServiceError> {
        let count = password_reset_codes::Entity::find()
            .filter(password_reset_codes::Column::UserId.eq(user_id.0))
            .filter(password_reset_codes::Column::UsedAt.is_null())
            .filter(password_reset_codes::Column::ExpiresAt.gt(now))
            .count(&self.db)
            .await
            .context("count active reset codes")?;
        Ok(count)
    }

    async fn create_with_outbox(
        &self,
        code: &PasswordResetCode,
        event: &OutboxEvent,
    ) -> Result<(), StorageServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let code = code.clone();
                let event = event.clone();
                Box::pin(async move {
                    password_reset_codes::ActiveModel {
                        id: Set(code.id),
                        user_id: Set(code.user_id.0),
                        code: Set(code.code),
                        expires_at: Set(code.expires_at),
                        used_at: Set(None),
                        created_at: Set(code.created_at),
                    }
                    .insert(txn)
                    .await?;
                    outbox_to_active_model(&event, code.created_at)
                        .insert(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .context("create reset code with outbox")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        user_id: UserId,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetCode>, StorageServiceError> {
        let model = password_reset_codes::Entity::find()
            .filter(password_reset_codes::Column::UserId.eq(user_id.0))
            .filter(password_reset_codes::Column::Code.eq(code))
            .filter(password_reset_codes::Column::UsedAt.is_null())
            .filter(password_reset_codes::Column::ExpiresAt.gt(now))
            .order_by_desc(password_reset_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find valid reset code")?;
        Ok(model.map(reset_code_from_model))
    }

    async fn consume_and_set_password(
        &self,
        code_id: Uuid,
        user_id: UserId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageServiceError> {
        let txn = self.db.begin().await.context("begin password reset")?;

        let consumed = password_reset_codes::Entity::update_many()
            .col_expr(password_reset_codes::Column::UsedAt, Expr::value(now))
            .filter(password_reset_codes::Column::Id.eq(code_id))
            .filter(password_reset_codes::Column::UsedAt.is_null())
            .exec(&txn)
            .await
            .context("consume reset code")?;
        if consumed.rows_affected == 0 {
            txn.rollback().await.context("rollback password reset")?;
            return Ok(false);
        }

        users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(user_id.0))
            .exec(&txn)
            .await
            .context("store new password hash")?;

        txn.commit().await.context("commit password reset")?;
        Ok(true)
    }
}

fn reset_code_from_model(model: password_reset_codes::Model) -> PasswordResetCode {
    PasswordResetCode {
        id: model.id,
        user_id: UserId(model.user_id),
        code: model.code,
        expires_at: model.expires_at,
        used_at: model.used_at,
        created_at: model.created_at,
    }
}

// ── Scan repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbScanRepository {
    pub db: DatabaseConnection,
}

impl ScanRepository for DbScanRepository {
    async fn record(&self, scan: &CodeScan) -> Result<(), StorageServiceError> {
        code_scans::ActiveModel {
            id: Set(scan.id),
            code: Set(scan.code.as_str().to_owned()),
            entry_id: Set(scan.entry_id.map(|id| id.0)),
            scanned_by: Set(scan.scanned_by.0),
            action: Set(scan.action.as_str().to_owned()),
            is_valid: Set(scan.action.is_valid()),
            scanned_at: Set(scan.scanned_at),
        }
        .insert(&self.db)
        .await
        .context("record code scan")?;
        Ok(())
    }

    async fn list_recent(&self, page: PageRequest) -> Result<Vec<CodeScan>, StorageServiceError> {
        let models = code_scans::Entity::find()
            .order_by_desc(code_scans::Column::ScannedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list recent code scans")?;
        models.into_iter().map(scan_from_model).collect()
    }
}

fn scan_from_model(model: code_scans::Model) -> Result<CodeScan, StorageServiceError> {
    let code = CodeValue::parse(&model.code)
        .with_context(|| format!("code scan {} code", model.id))?;
    let action = model
        .action
        .parse()
        .with_context(|| format!("code scan {} action", model.id))?;
    Ok(CodeScan {
        id: model.id,
        code,
        entry_id: model.entry_id.map(EntryId),
        scanned_by: UserId(model.scanned_by),
        action,
        scanned_at: model.scanned_at,
    })
}

// ── Outbox repository ────────────────────────────────────────────────────────

fn outbox_to_active_model(event: &OutboxEvent, now: DateTime<Utc>) -> outbox_events::ActiveModel {
    outbox_events::ActiveModel {
        id: Set(event.id),
        user_id: Set(event.user_id.map(|id| id.0)),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
}

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn fetch_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<PendingOutboxEvent>, StorageServiceError> {
        let models = outbox_events::Entity::find()
            .filter(outbox_events::Column::ProcessedAt.is_null())
            .filter(outbox_events::Column::FailedAt.is_null())
            .filter(outbox_events::Column::NextAttemptAt.lte(now))
            .order_by_asc(outbox_events::Column::NextAttemptAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("fetch due outbox events")?;
        models
            .into_iter()
            .map(|m| -> Result<PendingOutboxEvent, StorageServiceError> {
                let attempts = u32::try_from(m.attempts)
                    .with_context(|| format!("outbox event {} attempts", m.id))?;
                Ok(PendingOutboxEvent {
                    id: m.id,
                    kind: m.kind,
                    payload: m.payload,
                    attempts,
                })
            })
            .collect()
    }

    async fn mark_processed(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StorageServiceError> {
        outbox_events::ActiveModel {
            id: Set(id),
            processed_at: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark outbox event processed")?;
        Ok(())
    }

    async fn mark_retry(
        &self,
        id: Uuid,
        attempts: u32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), StorageServiceError> {
        let attempts = i32::try_from(attempts).context("outbox attempts out of range")?;
        outbox_events::ActiveModel {
            id: Set(id),
            attempts: Set(attempts),
            last_error: Set(Some(error.to_owned())),
            next_attempt_at: Set(next_attempt_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("schedule outbox retry")?;
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: u32,
        error: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageServiceError> {
        let attempts = i32::try_from(attempts).context("outbox attempts out of range")?;
        outbox_events::ActiveModel {
            id: Set(id),
            attempts: Set(attempts),
            last_error: Set(Some(error.to_owned())),
            failed_at: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark outbox event failed")?;
        Ok(())
    }
}
