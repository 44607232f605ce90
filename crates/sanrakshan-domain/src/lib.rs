//! Domain types shared across Sanrakshan crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod code;
pub mod entry;
pub mod id;
pub mod pagination;
pub mod profile;
pub mod user;
