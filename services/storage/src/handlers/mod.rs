pub mod accounts;
pub mod codes;
pub mod entries;
pub mod staff;

use sanrakshan_auth_types::identity::IdentityHeaders;
use sanrakshan_domain::id::UserId;

use crate::error::StorageServiceError;

/// Staff id of the caller, or `Forbidden`.
pub(crate) fn require_staff(identity: &IdentityHeaders) -> Result<UserId, StorageServiceError> {
    identity.staff_id().ok_or(StorageServiceError::Forbidden)
}
