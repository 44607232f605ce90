//! sea-orm entities for the storage service database.

pub mod code_scans;
pub mod outbox_events;
pub mod password_reset_codes;
pub mod storage_entries;
pub mod stored_items;
pub mod student_profiles;
pub mod users;
pub mod validation_codes;
