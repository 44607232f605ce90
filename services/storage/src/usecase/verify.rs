use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::entry::EntryStatus;
use sanrakshan_domain::id::UserId;

use crate::domain::repository::{
    AccountRepository, CodeRepository, EntryRepository, ProfileRepository, ScanRepository,
};
use crate::domain::types::{CodeScan, EntryDetails, OwnerSummary, ScanAction, VerifyOutcome};
use crate::error::StorageServiceError;

/// Resolve a code typed by staff to the entry it unlocks.
///
/// Entries and codes are never changed; every well-formed lookup is appended
/// to the scan log under the staff member's id.
pub struct VerifyCodeUseCase<C, E, A, P, S>
where
    C: CodeRepository,
    E: EntryRepository,
    A: AccountRepository,
    P: ProfileRepository,
    S: ScanRepository,
{
    pub codes: C,
    pub entries: E,
    pub accounts: A,
    pub profiles: P,
    pub scans: S,
}

impl<C, E, A, P, S> VerifyCodeUseCase<C, E, A, P, S>
where
    C: CodeRepository,
    E: EntryRepository,
    A: AccountRepository,
    P: ProfileRepository,
    S: ScanRepository,
{
    pub async fn execute(
        &self,
        staff: UserId,
        raw: &str,
    ) -> Result<VerifyOutcome, StorageServiceError> {
        let code = CodeValue::parse(raw).map_err(|_| StorageServiceError::InvalidCode)?;
        let outcome = self.resolve(&code).await?;

        let (entry_id, action) = match &outcome {
            VerifyOutcome::Verified(details) => (Some(details.entry.id), ScanAction::Verified),
            VerifyOutcome::NotFound => (None, ScanAction::NotFound),
            VerifyOutcome::Inactive { entry_id, .. } => (Some(*entry_id), ScanAction::Inactive),
        };
        self.scans
            .record(&CodeScan::new(code, entry_id, staff, action))
            .await?;
        Ok(outcome)
    }

    async fn resolve(&self, code: &CodeValue) -> Result<VerifyOutcome, StorageServiceError> {
        let Some(row) = self.codes.find_by_value(code).await? else {
            return Ok(VerifyOutcome::NotFound);
        };
        if !row.is_active {
            return Ok(VerifyOutcome::Inactive {
                entry_id: row.entry_id,
                claimed_at: row.deactivated_at,
            });
        }

        let entry = self
            .entries
            .find_by_id(row.entry_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("validation code {} has no entry", row.id))?;
        let mut items = self.entries.items(entry.id).await?;
        items.sort_by(|a, b| a.description.cmp(&b.description));

        let account = self
            .accounts
            .find_by_id(entry.owner_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("entry {} has no owner account", entry.id))?;
        let profile = self.profiles.find_by_user(entry.owner_id).await?;

        let owner = OwnerSummary {
            user_id: account.id,
            name: account.full_name(),
            email: account.email,
            roll_number: profile.as_ref().map(|p| p.roll_number.clone()),
            department: profile.as_ref().map(|p| p.department),
            year: profile.as_ref().map(|p| p.year),
            phone: profile.and_then(|p| p.phone),
        };

        Ok(VerifyOutcome::Verified(Box::new(EntryDetails {
            can_claim: entry.status.can_transition_to(EntryStatus::Claimed),
            entry,
            items,
            code: row.code,
            owner,
        })))
    }
}
