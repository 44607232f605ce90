use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use sanrakshan_domain::entry::EntryStatus;

/// Storage service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum StorageServiceError {
    #[error("entry must contain at least one item")]
    EmptyEntry,
    #[error("invalid item: {0}")]
    InvalidItem(String),
    #[error("too many items in one entry")]
    TooManyItems,
    #[error("invalid code")]
    InvalidCode,
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),
    #[error("password must be at least 8 characters")]
    WeakPassword,
    #[error("invalid reset code")]
    InvalidResetCode,
    #[error("code not found")]
    CodeNotFound,
    #[error("entry not found")]
    EntryNotFound,
    #[error("account not found")]
    AccountNotFound,
    #[error("student profile not found")]
    ProfileNotFound,
    #[error("code already claimed")]
    AlreadyClaimed,
    #[error("entry is {0} and cannot be claimed")]
    EntryNotClaimable(EntryStatus),
    #[error("account already exists")]
    AccountAlreadyExists,
    #[error("code collision")]
    CodeCollision,
    #[error("forbidden")]
    Forbidden,
    #[error("too many reset codes")]
    TooManyResetCodes,
    #[error("no unique code available")]
    GenerationExhausted,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StorageServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::InvalidItem(_) => "INVALID_ITEM",
            Self::TooManyItems => "TOO_MANY_ITEMS",
            Self::InvalidCode => "INVALID_CODE",
            Self::InvalidRegistration(_) => "INVALID_REGISTRATION",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidResetCode => "INVALID_RESET_CODE",
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::EntryNotFound => "ENTRY_NOT_FOUND",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::AlreadyClaimed => "ALREADY_CLAIMED",
            Self::EntryNotClaimable(_) => "ENTRY_NOT_CLAIMABLE",
            Self::AccountAlreadyExists => "ACCOUNT_ALREADY_EXISTS",
            Self::CodeCollision => "CODE_COLLISION",
            Self::Forbidden => "FORBIDDEN",
            Self::TooManyResetCodes => "TOO_MANY_RESET_CODES",
            Self::GenerationExhausted => "GENERATION_EXHAUSTED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Malformed input the caller should correct.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyEntry
                | Self::InvalidItem(_)
                | Self::TooManyItems
                | Self::InvalidCode
                | Self::InvalidRegistration(_)
                | Self::WeakPassword
        )
    }
}

impl IntoResponse for StorageServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            Self::InvalidResetCode => StatusCode::BAD_REQUEST,
            Self::CodeNotFound
            | Self::EntryNotFound
            | Self::AccountNotFound
            | Self::ProfileNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyClaimed
            | Self::EntryNotClaimable(_)
            | Self::AccountAlreadyExists
            | Self::CodeCollision => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::TooManyResetCodes => StatusCode::TOO_MANY_REQUESTS,
            Self::GenerationExhausted => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        // TraceLayer records every request; only failures an operator must act on are logged here.
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
            }
            Self::GenerationExhausted => {
                tracing::error!(kind = "GENERATION_EXHAUSTED", "validation code space exhausted");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
