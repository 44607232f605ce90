//! Identity types shared by Sanrakshan services.
//!
//! The gateway authenticates the caller and forwards the result as headers;
//! services extract it with [`identity::IdentityHeaders`].

pub mod identity;
