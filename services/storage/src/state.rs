use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAccountRepository, DbCodeRepository, DbEntryRepository, DbOutboxRepository,
    DbPasswordResetRepository, DbProfileRepository, DbScanRepository,
};
use crate::infra::mailer::Mailer;
use crate::infra::password::Argon2PasswordHasher;
use crate::usecase::code::RandomCodeSource;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: Mailer,
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl AppState {
    pub fn entry_repo(&self) -> DbEntryRepository {
        DbEntryRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_repo(&self) -> DbCodeRepository {
        DbCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn reset_repo(&self) -> DbPasswordResetRepository {
        DbPasswordResetRepository {
            db: self.db.clone(),
        }
    }

    pub fn outbox_repo(&self) -> DbOutboxRepository {
        DbOutboxRepository {
            db: self.db.clone(),
        }
    }

    pub fn scan_repo(&self) -> DbScanRepository {
        DbScanRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_source(&self) -> RandomCodeSource {
        RandomCodeSource
    }

    pub fn password_hasher(&self) -> Argon2PasswordHasher {
        Argon2PasswordHasher
    }
}
