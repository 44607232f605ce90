use chrono::Utc;

use sanrakshan_domain::code::CodeValue;
use sanrakshan_domain::id::{EntryId, UserId};

use crate::domain::repository::{CodeRepository, EntryRepository, ScanRepository};
use crate::domain::types::{ClaimOutcome, ClaimReceipt, CodeScan, ScanAction};
use crate::error::StorageServiceError;

pub struct ClaimInput {
    pub code: String,
    pub staff: UserId,
}

/// Hand items back: deactivate the code and mark the entry claimed.
///
/// The active check is repeated inside the conditional update, so of two
/// concurrent claims exactly one succeeds. Every attempt on a well-formed code
/// is appended to the scan log.
pub struct ClaimCodeUseCase<C, E, S>
where
    C: CodeRepository,
    E: EntryRepository,
    S: ScanRepository,
{
    pub codes: C,
    pub entries: E,
    pub scans: S,
}

impl<C, E, S> ClaimCodeUseCase<C, E, S>
where
    C: CodeRepository,
    E: EntryRepository,
    S: ScanRepository,
{
    pub async fn execute(&self, input: ClaimInput) -> Result<ClaimReceipt, StorageServiceError> {
        let code = CodeValue::parse(&input.code).map_err(|_| StorageServiceError::InvalidCode)?;

        let Some(row) = self.codes.find_by_value(&code).await? else {
            self.refuse(code, None, input.staff, ScanAction::NotFound)
                .await?;
            return Err(StorageServiceError::CodeNotFound);
        };
        if !row.is_active {
            self.refuse(code, Some(row.entry_id), input.staff, ScanAction::AlreadyClaimed)
                .await?;
            return Err(StorageServiceError::AlreadyClaimed);
        }

        let claimed_at = Utc::now();
        match self
            .codes
            .claim(row.id, row.entry_id, input.staff, claimed_at)
            .await?
        {
            ClaimOutcome::Claimed => {}
            ClaimOutcome::CodeInactive => {
                tracing::info!(entry_id = %row.entry_id, "lost claim race");
                self.refuse(code, Some(row.entry_id), input.staff, ScanAction::AlreadyClaimed)
                    .await?;
                return Err(StorageServiceError::AlreadyClaimed);
            }
            ClaimOutcome::EntryNotActive(status) => {
                self.refuse(code, Some(row.entry_id), input.staff, ScanAction::NotClaimable)
                    .await?;
                return Err(StorageServiceError::EntryNotClaimable(status));
            }
        }

        // The claim is committed; a failed log write must not turn it into an error.
        let scan = CodeScan::new(
            row.code.clone(),
            Some(row.entry_id),
            input.staff,
            ScanAction::Claimed,
        );
        if let Err(e) = self.scans.record(&scan).await {
            tracing::error!(entry_id = %row.entry_id, error = ?e, "failed to record claim scan");
        }

        let item_count = self.entries.items(row.entry_id).await?.len();
        tracing::info!(
            entry_id = %row.entry_id,
            staff_id = %input.staff,
            item_count,
            "storage entry claimed"
        );
        Ok(ClaimReceipt {
            entry_id: row.entry_id,
            code: row.code,
            claimed_at,
            claimed_by: input.staff,
            item_count,
        })
    }

    async fn refuse(
        &self,
        code: CodeValue,
        entry_id: Option<EntryId>,
        staff: UserId,
        action: ScanAction,
    ) -> Result<(), StorageServiceError> {
        self.scans
            .record(&CodeScan::new(code, entry_id, staff, action))
            .await
    }
}
