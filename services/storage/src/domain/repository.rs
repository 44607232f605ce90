#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::entry::EntryStatus;
use sanrakshan_domain::id::{EntryId, UserId};
use sanrakshan_domain::pagination::PageRequest;

use crate::domain::types::{
    Account, ClaimOutcome, CodeScan, EmailMessage, NewEntry, OutboxEvent, PasswordResetCode,
    PendingOutboxEvent, StatusSummary, StorageEntry, StoredItem, StudentProfile, ValidationCode,
};
use crate::error::StorageServiceError;

/// Source of candidate validation codes.
pub trait CodeSource: Send + Sync {
    fn next_code(&self) -> CodeValue;
}

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, StorageServiceError>;
}

/// Repository for storage entries and their items.
pub trait EntryRepository: Send + Sync {
    /// Insert entry, items and code in one transaction.
    ///
    /// Returns `CodeCollision` if the code is already held by an active row.
    async fn create(&self, new: &NewEntry) -> Result<(), StorageServiceError>;

    async fn find_by_id(&self, id: EntryId) -> Result<Option<StorageEntry>, StorageServiceError>;

    /// Owner's entries, newest first.
    async fn list_by_owner(
        &self,
        owner: UserId,
        status: Option<EntryStatus>,
        page: PageRequest,
    ) -> Result<Vec<StorageEntry>, StorageServiceError>;

    /// Items of an entry ordered by description.
    async fn items(&self, entry_id: EntryId) -> Result<Vec<StoredItem>, StorageServiceError>;

    async fn count_by_status(&self) -> Result<StatusSummary, StorageServiceError>;

    /// Transition active entries created before `cutoff` to expired. Returns the number changed.
    async fn expire_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageServiceError>;

    /// Delete expired entries last updated before `before`. Returns the number deleted.
    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64, StorageServiceError>;
}

/// Repository for validation codes.
pub trait CodeRepository: Send + Sync {
    /// Whether an active row currently holds `code`.
    async fn is_active(&self, code: &CodeValue) -> Result<bool, StorageServiceError>;

    /// Look up a code, preferring the active row over deactivated ones.
    async fn find_by_value(
        &self,
        code: &CodeValue,
    ) -> Result<Option<ValidationCode>, StorageServiceError>;

    async fn find_by_entry(
        &self,
        entry_id: EntryId,
    ) -> Result<Option<ValidationCode>, StorageServiceError>;

    /// Deactivate the code and mark its entry claimed, atomically.
    ///
    /// Both updates are conditional (`is_active`, `status = 'active'`); if either
    /// matches no row nothing is changed.
    async fn claim(
        &self,
        code_id: Uuid,
        entry_id: EntryId,
        staff: UserId,
        at: DateTime<Utc>,
    ) -> Result<ClaimOutcome, StorageServiceError>;
}

/// Repository for accounts.
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Account>, StorageServiceError>;

    /// Lookup by lowercased email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageServiceError>;

    /// Insert account and profile in one transaction.
    ///
    /// Returns `AccountAlreadyExists` on a duplicate username, email or roll number.
    async fn create_with_profile(
        &self,
        account: &Account,
        profile: &StudentProfile,
    ) -> Result<(), StorageServiceError>;
}

/// Repository for student profiles.
pub trait ProfileRepository: Send + Sync {
    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<StudentProfile>, StorageServiceError>;
}

/// Repository for password reset codes.
pub trait PasswordResetRepository: Send + Sync {
    /// Count unused, unexpired codes for an account.
    async fn count_active(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageServiceError>;

    /// Insert a reset code and its outbox event atomically.
    async fn create_with_outbox(
        &self,
        code: &PasswordResetCode,
        event: &OutboxEvent,
    ) -> Result<(), StorageServiceError>;

    /// Find an unused, unexpired code for an account.
    async fn find_valid(
        &self,
        user_id: UserId,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetCode>, StorageServiceError>;

    /// Mark the code used (only if still unused) and store the new password hash,
    /// in one transaction. Returns `false` if the code had already been used.
    async fn consume_and_set_password(
        &self,
        code_id: Uuid,
        user_id: UserId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageServiceError>;
}

/// Append-only log of staff scans.
pub trait ScanRepository: Send + Sync {
    async fn record(&self, scan: &CodeScan) -> Result<(), StorageServiceError>;

    /// Most recent first.
    async fn list_recent(&self, page: PageRequest) -> Result<Vec<CodeScan>, StorageServiceError>;
}

/// Repository for outbox events awaiting delivery.
pub trait OutboxRepository: Send + Sync {
    /// Unprocessed, unfailed events whose next attempt is due, oldest first.
    async fn fetch_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<PendingOutboxEvent>, StorageServiceError>;

    async fn mark_processed(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StorageServiceError>;

    /// Record a failed attempt and schedule the next one.
    async fn mark_retry(
        &self,
        id: Uuid,
        attempts: u32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), StorageServiceError>;

    /// Record the final failed attempt; the event is not retried again.
    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: u32,
        error: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageServiceError>;
}

/// Outgoing email transport.
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), StorageServiceError>;
}
