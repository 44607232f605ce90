use chrono::{Duration, Utc};
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{AccountRepository, PasswordHasher, PasswordResetRepository};
use crate::domain::types::{
    MAX_ACTIVE_RESET_CODES, OutboxEvent, PASSWORD_RESET_REQUESTED, PasswordResetCode,
    RESET_CODE_LEN, RESET_CODE_TTL_SECS, normalize_email,
};
use crate::error::StorageServiceError;
use crate::usecase::account::check_password;

fn generate_reset_code() -> String {
    let mut rng = rand::rng();
    (0..RESET_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

// ── Request ──────────────────────────────────────────────────────────────────

pub struct RequestPasswordResetInput {
    pub email: String,
}

pub struct RequestPasswordResetUseCase<A, R>
where
    A: AccountRepository,
    R: PasswordResetRepository,
{
    pub accounts: A,
    pub resets: R,
}

impl<A, R> RequestPasswordResetUseCase<A, R>
where
    A: AccountRepository,
    R: PasswordResetRepository,
{
    pub async fn execute(&self, input: RequestPasswordResetInput) -> Result<(), StorageServiceError> {
        // 1. Find account by email → 404 if not found
        let email = normalize_email(&input.email).ok_or(StorageServiceError::AccountNotFound)?;
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(StorageServiceError::AccountNotFound)?;

        // 2. Check live code limit → 429 if at or over limit
        let now = Utc::now();
        let active = self.resets.count_active(account.id, now).await?;
        if active >= MAX_ACTIVE_RESET_CODES {
            return Err(StorageServiceError::TooManyResetCodes);
        }

        // 3. Code row + email event in one transaction; the worker sends it
        let code = PasswordResetCode {
            id: Uuid::now_v7(),
            user_id: account.id,
            code: generate_reset_code(),
            expires_at: now + Duration::seconds(RESET_CODE_TTL_SECS),
            used_at: None,
            created_at: now,
        };
        let event = OutboxEvent {
            id: Uuid::now_v7(),
            user_id: Some(account.id),
            kind: PASSWORD_RESET_REQUESTED.to_owned(),
            payload: json!({
                "email": account.email,
                "name": account.full_name(),
                "code": code.code,
                "expires_at": code.expires_at,
            }),
            idempotency_key: format!("{PASSWORD_RESET_REQUESTED}:{}", code.id),
        };

        self.resets.create_with_outbox(&code, &event).await?;
        tracing::info!(user_id = %account.id, "password reset requested");
        Ok(())
    }
}

// ── Confirm ──────────────────────────────────────────────────────────────────

pub struct ConfirmPasswordResetInput {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub struct ConfirmPasswordResetUseCase<A, R, H>
where
    A: AccountRepository,
    R: PasswordResetRepository,
    H: PasswordHasher,
{
    pub accounts: A,
    pub resets: R,
    pub hasher: H,
}

impl<A, R, H> ConfirmPasswordResetUseCase<A, R, H>
where
    A: AccountRepository,
    R: PasswordResetRepository,
    H: PasswordHasher,
{
    /// Unknown emails, wrong codes, expired and used codes all report `InvalidResetCode`.
    pub async fn execute(&self, input: ConfirmPasswordResetInput) -> Result<(), StorageServiceError> {
        check_password(&input.new_password)?;

        let Some(email) = normalize_email(&input.email) else {
            return Err(StorageServiceError::InvalidResetCode);
        };
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(StorageServiceError::InvalidResetCode)?;

        let now = Utc::now();
        let code = self
            .resets
            .find_valid(account.id, input.code.trim(), now)
            .await?
            .ok_or(StorageServiceError::InvalidResetCode)?;

        let hash = self.hasher.hash(&input.new_password)?;
        if !self
            .resets
            .consume_and_set_password(code.id, account.id, &hash, now)
            .await?
        {
            return Err(StorageServiceError::InvalidResetCode);
        }
        tracing::info!(user_id = %account.id, "password reset completed");
        Ok(())
    }
}
