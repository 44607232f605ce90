use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::entry::EntryStatus;
use sanrakshan_domain::id::{EntryId, UserId};
use sanrakshan_domain::pagination::PageRequest;
use sanrakshan_domain::profile::Department;
use sanrakshan_domain::user::UserRole;
use sanrakshan_storage::domain::repository::{
    AccountRepository, CodeRepository, CodeSource, EmailSender, EntryRepository,
    OutboxRepository, PasswordHasher, PasswordResetRepository, ProfileRepository, ScanRepository,
};
use sanrakshan_storage::domain::types::{
    Account, ClaimOutcome, CodeScan, EmailMessage, NewEntry, NewItem, OutboxEvent,
    PasswordResetCode, PendingOutboxEvent, ScanAction, StatusSummary, StorageEntry, StoredItem,
    StudentProfile, ValidationCode,
};
use sanrakshan_storage::error::StorageServiceError;
use sanrakshan_storage::usecase::code::CodeGenerator;
use sanrakshan_storage::usecase::entry::{CreateEntryInput, CreateEntryUseCase, CreatedEntry};

// ── Shared in-memory store ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OutboxRow {
    pub event: OutboxEvent,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub next_attempt_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct StoreData {
    pub accounts: Vec<Account>,
    pub profiles: Vec<StudentProfile>,
    pub entries: Vec<StorageEntry>,
    pub items: Vec<StoredItem>,
    pub codes: Vec<ValidationCode>,
    pub resets: Vec<PasswordResetCode>,
    pub outbox: Vec<OutboxRow>,
    pub scans: Vec<CodeScan>,
    /// Scan log writes fail while set.
    pub fail_scan_writes: bool,
    /// Inserts that fail with `CodeCollision` before one succeeds.
    pub insert_collisions: u32,
}

/// One in-memory database shared by every mock repository handed out.
#[derive(Clone, Default)]
pub struct MockStore {
    pub data: Arc<Mutex<StoreData>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> MockEntryRepo {
        MockEntryRepo {
            data: Arc::clone(&self.data),
        }
    }

    pub fn codes(&self) -> MockCodeRepo {
        MockCodeRepo {
            data: Arc::clone(&self.data),
        }
    }

    pub fn accounts(&self) -> MockAccountRepo {
        MockAccountRepo {
            data: Arc::clone(&self.data),
        }
    }

    pub fn profiles(&self) -> MockProfileRepo {
        MockProfileRepo {
            data: Arc::clone(&self.data),
        }
    }

    pub fn resets(&self) -> MockResetRepo {
        MockResetRepo {
            data: Arc::clone(&self.data),
        }
    }

    pub fn outbox(&self) -> MockOutboxRepo {
        MockOutboxRepo {
            data: Arc::clone(&self.data),
        }
    }

    pub fn scans(&self) -> MockScanRepo {
        MockScanRepo {
            data: Arc::clone(&self.data),
        }
    }

    /// Recorded scan actions, oldest first.
    pub fn scan_actions(&self) -> Vec<ScanAction> {
        self.with(|d| d.scans.iter().map(|s| s.action).collect())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut StoreData) -> R) -> R {
        f(&mut self.data.lock().unwrap())
    }

    pub fn add_student(&self, account: Account, profile: StudentProfile) {
        self.with(|d| {
            d.accounts.push(account);
            d.profiles.push(profile);
        });
    }

    pub fn add_account(&self, account: Account) {
        self.with(|d| d.accounts.push(account));
    }

    pub fn entry(&self, id: EntryId) -> Option<StorageEntry> {
        self.with(|d| d.entries.iter().find(|e| e.id == id).cloned())
    }

    pub fn code_for(&self, id: EntryId) -> Option<ValidationCode> {
        self.with(|d| d.codes.iter().find(|c| c.entry_id == id).cloned())
    }
}

// ── MockEntryRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockEntryRepo {
    data: Arc<Mutex<StoreData>>,
}

impl EntryRepository for MockEntryRepo {
    async fn create(&self, new: &NewEntry) -> Result<(), StorageServiceError> {
        let mut d = self.data.lock().unwrap();
        if d.insert_collisions > 0 {
            d.insert_collisions -= 1;
            return Err(StorageServiceError::CodeCollision);
        }
        if d
            .codes
            .iter()
            .any(|c| c.is_active && c.code == new.code.code)
        {
            return Err(StorageServiceError::CodeCollision);
        }
        d.entries.push(new.entry.clone());
        d.items.extend(new.items.iter().cloned());
        d.codes.push(new.code.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<StorageEntry>, StorageServiceError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        status: Option<EntryStatus>,
        page: PageRequest,
    ) -> Result<Vec<StorageEntry>, StorageServiceError> {
        let d = self.data.lock().unwrap();
        let mut entries: Vec<StorageEntry> = d
            .entries
            .iter()
            .filter(|e| e.owner_id == owner && status.is_none_or(|s| e.status == s))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn items(&self, entry_id: EntryId) -> Result<Vec<StoredItem>, StorageServiceError> {
        let mut items: Vec<StoredItem> = self
            .data
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|i| i.entry_id == entry_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.description.cmp(&b.description));
        Ok(items)
    }

    async fn count_by_status(&self) -> Result<StatusSummary, StorageServiceError> {
        let d = self.data.lock().unwrap();
        let count = |s: EntryStatus| d.entries.iter().filter(|e| e.status == s).count() as u64;
        Ok(StatusSummary {
            active: count(EntryStatus::Active),
            claimed: count(EntryStatus::Claimed),
            expired: count(EntryStatus::Expired),
        })
    }

    async fn expire_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageServiceError> {
        let mut d = self.data.lock().unwrap();
        let now = Utc::now();
        let mut expired = 0;
        for e in d
            .entries
            .iter_mut()
            .filter(|e| e.status == EntryStatus::Active && e.created_at < cutoff)
        {
            e.status = EntryStatus::Expired;
            e.updated_at = now;
            expired += 1;
        }
        Ok(expired)
    }

    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64, StorageServiceError> {
        let mut d = self.data.lock().unwrap();
        let doomed: Vec<EntryId> = d
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Expired && e.updated_at < before)
            .map(|e| e.id)
            .collect();
        d.entries.retain(|e| !doomed.contains(&e.id));
        d.items.retain(|i| !doomed.contains(&i.entry_id));
        d.codes.retain(|c| !doomed.contains(&c.entry_id));
        Ok(doomed.len() as u64)
    }
}

// ── MockCodeRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockCodeRepo {
    data: Arc<Mutex<StoreData>>,
}

impl CodeRepository for MockCodeRepo {
    async fn is_active(&self, code: &CodeValue) -> Result<bool, StorageServiceError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .codes
            .iter()
            .any(|c| c.is_active && &c.code == code))
    }

    async fn find_by_value(
        &self,
        code: &CodeValue,
    ) -> Result<Option<ValidationCode>, StorageServiceError> {
        let d = self.data.lock().unwrap();
        let matching = d.codes.iter().filter(|c| &c.code == code);
        Ok(matching
            .max_by_key(|c| (c.is_active, c.created_at))
            .cloned())
    }

    async fn find_by_entry(
        &self,
        entry_id: EntryId,
    ) -> Result<Option<ValidationCode>, StorageServiceError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .codes
            .iter()
            .find(|c| c.entry_id == entry_id)
            .cloned())
    }

    async fn claim(
        &self,
        code_id: Uuid,
        entry_id: EntryId,
        staff: UserId,
        at: DateTime<Utc>,
    ) -> Result<ClaimOutcome, StorageServiceError> {
        // Let a concurrent claim reach this point too.
        tokio::task::yield_now().await;

        let mut d = self.data.lock().unwrap();
        let Some(code_idx) = d.codes.iter().position(|c| c.id == code_id && c.is_active) else {
            return Ok(ClaimOutcome::CodeInactive);
        };
        let Some(entry) = d.entries.iter_mut().find(|e| e.id == entry_id) else {
            return Err(anyhow::anyhow!("entry {entry_id} missing").into());
        };
        if entry.status != EntryStatus::Active {
            return Ok(ClaimOutcome::EntryNotActive(entry.status));
        }
        entry.status = EntryStatus::Claimed;
        entry.claimed_at = Some(at);
        entry.claimed_by = Some(staff);
        entry.updated_at = at;

        let code = &mut d.codes[code_idx];
        code.is_active = false;
        code.deactivated_at = Some(at);
        Ok(ClaimOutcome::Claimed)
    }
}

// ── MockAccountRepo / MockProfileRepo ────────────────────────────────────────

#[derive(Clone)]
pub struct MockAccountRepo {
    data: Arc<Mutex<StoreData>>,
}

impl AccountRepository for MockAccountRepo {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Account>, StorageServiceError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageServiceError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn create_with_profile(
        &self,
        account: &Account,
        profile: &StudentProfile,
    ) -> Result<(), StorageServiceError> {
        let mut d = self.data.lock().unwrap();
        let taken = d
            .accounts
            .iter()
            .any(|a| a.email == account.email || a.username == account.username)
            || d
                .profiles
                .iter()
                .any(|p| p.roll_number == profile.roll_number);
        if taken {
            return Err(StorageServiceError::AccountAlreadyExists);
        }
        d.accounts.push(account.clone());
        d.profiles.push(profile.clone());
        Ok(())
    }
}

#[derive(Clone)]
pub struct MockProfileRepo {
    data: Arc<Mutex<StoreData>>,
}

impl ProfileRepository for MockProfileRepo {
    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<StudentProfile>, StorageServiceError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }
}

// ── MockResetRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockResetRepo {
    data: Arc<Mutex<StoreData>>,
}

impl PasswordResetRepository for MockResetRepo {
    async fn count_active(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<u64, StorageServiceError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .resets
            .iter()
            .filter(|r| r.user_id == user_id && r.is_valid_at(now))
            .count() as u64)
    }

    async fn create_with_outbox(
        &self,
        code: &PasswordResetCode,
        event: &OutboxEvent,
    ) -> Result<(), StorageServiceError> {
        let mut d = self.data.lock().unwrap();
        d.resets.push(code.clone());
        d.outbox.push(OutboxRow {
            event: event.clone(),
            attempts: 0,
            last_error: None,
            next_attempt_at: code.created_at,
            processed_at: None,
            failed_at: None,
        });
        Ok(())
    }

    async fn find_valid(
        &self,
        user_id: UserId,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetCode>, StorageServiceError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .resets
            .iter()
            .find(|r| r.user_id == user_id && r.code == code && r.is_valid_at(now))
            .cloned())
    }

    async fn consume_and_set_password(
        &self,
        code_id: Uuid,
        user_id: UserId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageServiceError> {
        tokio::task::yield_now().await;

        let mut d = self.data.lock().unwrap();
        let Some(reset) = d
            .resets
            .iter_mut()
            .find(|r| r.id == code_id && r.used_at.is_none())
        else {
            return Ok(false);
        };
        reset.used_at = Some(now);
        if let Some(account) = d.accounts.iter_mut().find(|a| a.id == user_id) {
            account.password_hash = password_hash.to_owned();
            account.updated_at = now;
        }
        Ok(true)
    }
}

// ── MockOutboxRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockOutboxRepo {
    data: Arc<Mutex<StoreData>>,
}

impl MockOutboxRepo {
    fn update(&self, id: Uuid, f: impl FnOnce(&mut OutboxRow)) -> Result<(), StorageServiceError> {
        let mut d = self.data.lock().unwrap();
        let row = d
            .outbox
            .iter_mut()
            .find(|r| r.event.id == id)
            .ok_or_else(|| anyhow::anyhow!("outbox event {id} missing"))?;
        f(row);
        Ok(())
    }
}

impl OutboxRepository for MockOutboxRepo {
    async fn fetch_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<PendingOutboxEvent>, StorageServiceError> {
        let d = self.data.lock().unwrap();
        let mut due: Vec<&OutboxRow> = d
            .outbox
            .iter()
            .filter(|r| r.processed_at.is_none() && r.failed_at.is_none() && r.next_attempt_at <= now)
            .collect();
        due.sort_by_key(|r| r.next_attempt_at);
        Ok(due
            .into_iter()
            .take(limit as usize)
            .map(|r| PendingOutboxEvent {
                id: r.event.id,
                kind: r.event.kind.clone(),
                payload: r.event.payload.clone(),
                attempts: r.attempts,
            })
            .collect())
    }

    async fn mark_processed(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StorageServiceError> {
        self.update(id, |r| r.processed_at = Some(at))
    }

    async fn mark_retry(
        &self,
        id: Uuid,
        attempts: u32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), StorageServiceError> {
        self.update(id, |r| {
            r.attempts = attempts;
            r.last_error = Some(error.to_owned());
            r.next_attempt_at = next_attempt_at;
        })
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: u32,
        error: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageServiceError> {
        self.update(id, |r| {
            r.attempts = attempts;
            r.last_error = Some(error.to_owned());
            r.failed_at = Some(at);
        })
    }
}

// ── MockScanRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockScanRepo {
    data: Arc<Mutex<StoreData>>,
}

impl ScanRepository for MockScanRepo {
    async fn record(&self, scan: &CodeScan) -> Result<(), StorageServiceError> {
        let mut d = self.data.lock().unwrap();
        if d.fail_scan_writes {
            return Err(anyhow::anyhow!("scan log unavailable").into());
        }
        d.scans.push(scan.clone());
        Ok(())
    }

    async fn list_recent(&self, page: PageRequest) -> Result<Vec<CodeScan>, StorageServiceError> {
        let d = self.data.lock().unwrap();
        let mut scans = d.scans.clone();
        scans.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at).then(b.id.cmp(&a.id)));
        Ok(scans
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

// ── Code source / hasher / mailer ────────────────────────────────────────────

/// Hands out the given codes in order, repeating the last one.
pub struct SequenceCodeSource {
    codes: Vec<CodeValue>,
    next: Mutex<usize>,
}

impl SequenceCodeSource {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: codes.iter().map(|c| CodeValue::parse(c).unwrap()).collect(),
            next: Mutex::new(0),
        }
    }

    pub fn drawn(&self) -> usize {
        *self.next.lock().unwrap()
    }
}

impl CodeSource for SequenceCodeSource {
    fn next_code(&self) -> CodeValue {
        let mut next = self.next.lock().unwrap();
        let code = self.codes[(*next).min(self.codes.len() - 1)].clone();
        *next += 1;
        code
    }
}

/// Cleartext "hash" so tests can assert what was stored.
#[derive(Clone, Copy, Default)]
pub struct MockHasher;

impl PasswordHasher for MockHasher {
    fn hash(&self, password: &str) -> Result<String, StorageServiceError> {
        Ok(format!("hashed:{password}"))
    }
}

#[derive(Clone, Default)]
pub struct MockEmailSender {
    pub sent: Arc<Mutex<Vec<EmailMessage>>>,
    pub fail: bool,
}

impl MockEmailSender {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl EmailSender for MockEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), StorageServiceError> {
        if self.fail {
            return Err(anyhow::anyhow!("relay unavailable").into());
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_account(username: &str, role: UserRole) -> Account {
    let now = Utc::now();
    Account {
        id: UserId(Uuid::now_v7()),
        username: username.to_owned(),
        email: format!("{username}@iiitk.ac.in"),
        first_name: "Asha".to_owned(),
        last_name: "Kumar".to_owned(),
        password_hash: "hashed:old-password".to_owned(),
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_profile(user_id: UserId, roll_number: &str) -> StudentProfile {
    let now = Utc::now();
    StudentProfile {
        id: Uuid::now_v7(),
        user_id,
        roll_number: roll_number.to_owned(),
        department: Department::Bcs,
        year: 2,
        phone: Some("9876543210".to_owned()),
        hostel_room: Some("B-204".to_owned()),
        created_at: now,
        updated_at: now,
    }
}

/// Seed a student with a profile and return the account.
pub fn seed_student(store: &MockStore, username: &str, roll_number: &str) -> Account {
    let account = test_account(username, UserRole::Student);
    store.add_student(account.clone(), test_profile(account.id, roll_number));
    account
}

pub fn seed_staff(store: &MockStore) -> Account {
    let account = test_account("warden", UserRole::Staff);
    store.add_account(account.clone());
    account
}

/// Store items for `owner` under a fixed code.
pub async fn seed_entry(
    store: &MockStore,
    owner: UserId,
    code: &str,
    items: &[&str],
) -> CreatedEntry {
    CreateEntryUseCase {
        generator: CodeGenerator {
            source: SequenceCodeSource::new(&[code]),
            codes: store.codes(),
        },
        entries: store.entries(),
        profiles: store.profiles(),
    }
    .execute(CreateEntryInput {
        owner,
        items: items.iter().map(|d| NewItem::named(d)).collect(),
        notes: None,
        storage_location: Some("Locker room 2".to_owned()),
    })
    .await
    .unwrap()
}
