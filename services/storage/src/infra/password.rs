use argon2::Argon2;
use argon2::password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng};

use crate::domain::repository::PasswordHasher;
use crate::error::StorageServiceError;

/// Argon2id with the crate's default parameters, PHC string output.
#[derive(Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, StorageServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
        Ok(hash.to_string())
    }
}
