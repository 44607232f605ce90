use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::entry::{EntryStatus, ItemCategory, UnknownVariant};
use sanrakshan_domain::id::{EntryId, UserId};
use sanrakshan_domain::profile::Department;
use sanrakshan_domain::user::UserRole;

/// Account record (student or staff).
#[derive(Debug, Clone)]
pub struct Account {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

#[derive(Debug, Clone)]
pub struct StudentProfile {
    pub id: Uuid,
    pub user_id: UserId,
    pub roll_number: String,
    pub department: Department,
    pub year: u8,
    pub phone: Option<String>,
    pub hostel_room: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One student's batch of stored items.
#[derive(Debug, Clone)]
pub struct StorageEntry {
    pub id: EntryId,
    pub owner_id: UserId,
    pub status: EntryStatus,
    pub notes: Option<String>,
    pub storage_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub claimed_by: Option<UserId>,
}

#[derive(Debug, Clone)]
pub struct StoredItem {
    pub id: Uuid,
    pub entry_id: EntryId,
    pub description: String,
    pub category: ItemCategory,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// Item as submitted by a student, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub description: String,
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl NewItem {
    pub fn named(description: &str) -> Self {
        Self {
            description: description.to_owned(),
            category: ItemCategory::default(),
            quantity: default_quantity(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationCode {
    pub id: Uuid,
    pub entry_id: EntryId,
    pub code: CodeValue,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub deactivated_at: Option<DateTime<Utc>>,
}

/// Rows inserted together when a student submits an entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub entry: StorageEntry,
    pub items: Vec<StoredItem>,
    pub code: ValidationCode,
}

/// Owner details shown to staff at verification.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub roll_number: Option<String>,
    pub department: Option<Department>,
    pub year: Option<u8>,
    pub phone: Option<String>,
}

/// Everything staff need to hand items back.
#[derive(Debug, Clone)]
pub struct EntryDetails {
    pub entry: StorageEntry,
    pub items: Vec<StoredItem>,
    pub code: CodeValue,
    pub owner: OwnerSummary,
    pub can_claim: bool,
}

#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    Verified(Box<EntryDetails>),
    NotFound,
    /// The code existed but was deactivated by a claim.
    Inactive {
        entry_id: EntryId,
        claimed_at: Option<DateTime<Utc>>,
    },
}

/// Result of the conditional claim updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    /// The code was no longer active when the update ran.
    CodeInactive,
    /// The code was active but its entry was not; nothing was changed.
    EntryNotActive(EntryStatus),
}

#[derive(Debug, Clone)]
pub struct ClaimReceipt {
    pub entry_id: EntryId,
    pub code: CodeValue,
    pub claimed_at: DateTime<Utc>,
    pub claimed_by: UserId,
    pub item_count: usize,
}

/// What a staff lookup or claim attempt on a code resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanAction {
    Verified,
    NotFound,
    Inactive,
    Claimed,
    AlreadyClaimed,
    /// Claim refused because the entry is no longer active.
    NotClaimable,
}

impl ScanAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::NotFound => "not_found",
            Self::Inactive => "inactive",
            Self::Claimed => "claimed",
            Self::AlreadyClaimed => "already_claimed",
            Self::NotClaimable => "not_claimable",
        }
    }

    /// The code resolved to a live entry.
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Verified | Self::Claimed)
    }
}

impl FromStr for ScanAction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verified" => Ok(Self::Verified),
            "not_found" => Ok(Self::NotFound),
            "inactive" => Ok(Self::Inactive),
            "claimed" => Ok(Self::Claimed),
            "already_claimed" => Ok(Self::AlreadyClaimed),
            "not_claimable" => Ok(Self::NotClaimable),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// Audit record of one staff scan.
#[derive(Debug, Clone)]
pub struct CodeScan {
    pub id: Uuid,
    pub code: CodeValue,
    pub entry_id: Option<EntryId>,
    pub scanned_by: UserId,
    pub action: ScanAction,
    pub scanned_at: DateTime<Utc>,
}

impl CodeScan {
    pub fn new(
        code: CodeValue,
        entry_id: Option<EntryId>,
        scanned_by: UserId,
        action: ScanAction,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            code,
            entry_id,
            scanned_by,
            action,
            scanned_at: Utc::now(),
        }
    }
}

/// Entry counts per status for the staff dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub active: u64,
    pub claimed: u64,
    pub expired: u64,
}

impl StatusSummary {
    pub fn total(&self) -> u64 {
        self.active + self.claimed + self.expired
    }
}

/// Single-use six-digit password reset code.
#[derive(Debug, Clone)]
pub struct PasswordResetCode {
    pub id: Uuid,
    pub user_id: UserId,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetCode {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

/// Outbox event for async delivery (e.g. password reset email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub user_id: Option<UserId>,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// An undelivered outbox row picked up by the worker.
#[derive(Debug, Clone)]
pub struct PendingOutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbox kind for password reset emails.
pub const PASSWORD_RESET_REQUESTED: &str = "password_reset_requested";

/// Maximum number of items in one entry.
pub const MAX_ITEMS_PER_ENTRY: usize = 50;

/// Maximum item description length in characters.
pub const MAX_ITEM_DESCRIPTION_LEN: usize = 200;

/// Upper bound on one item's quantity; stored as a 32-bit column.
pub const MAX_ITEM_QUANTITY: u32 = 10_000;

/// Candidate codes tried before giving up with `GenerationExhausted`.
pub const MAX_CODE_ATTEMPTS: u32 = 16;

pub const MIN_PASSWORD_LEN: usize = 8;

pub const RESET_CODE_LEN: usize = 6;

pub const RESET_CODE_TTL_SECS: i64 = 15 * 60;

/// Maximum number of live (unused, unexpired) reset codes per account.
pub const MAX_ACTIVE_RESET_CODES: u64 = 5;

/// Delivery attempts before an outbox event is marked failed.
pub const MAX_DELIVERY_ATTEMPTS: u32 = 5;

/// Retry delay grows linearly: attempt `n` waits `n * OUTBOX_RETRY_STEP_SECS`.
pub const OUTBOX_RETRY_STEP_SECS: i64 = 30;

/// Outbox rows handled per worker tick.
pub const OUTBOX_BATCH_SIZE: u64 = 20;

/// Validate a username: ASCII alphanumeric plus `.`, `-`, `_`, 3-30 chars,
/// starting with a letter or digit.
pub fn validate_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }
    if !username.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Trim and lowercase an email address. Returns `None` unless it has the shape
/// `local@domain.tld` with no whitespace.
pub fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim().to_ascii_lowercase();
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return None;
    }
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.contains('@') {
        return None;
    }
    let (host, tld) = domain.rsplit_once('.')?;
    if host.is_empty() || tld.is_empty() {
        return None;
    }
    Some(email)
}
