pub mod account;
pub mod claim;
pub mod code;
pub mod entry;
pub mod outbox;
pub mod password_reset;
pub mod scan;
pub mod verify;
