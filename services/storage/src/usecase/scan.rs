use sanrakshan_domain::pagination::PageRequest;

use crate::domain::repository::ScanRepository;
use crate::domain::types::CodeScan;
use crate::error::StorageServiceError;

/// Recent staff scans for the audit view.
pub struct ListScansUseCase<S>
where
    S: ScanRepository,
{
    pub scans: S,
}

impl<S> ListScansUseCase<S>
where
    S: ScanRepository,
{
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<CodeScan>, StorageServiceError> {
        self.scans.list_recent(page.clamped()).await
    }
}
