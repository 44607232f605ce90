use serde::Deserialize;

use sanrakshan_core::config::Config;

/// Storage service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port to listen on (default 3114). Env var: `STORAGE_PORT`.
    #[serde(default = "default_storage_port")]
    pub storage_port: u16,
    /// Mail relay endpoint. Unset means emails are only logged.
    pub mail_relay_url: Option<String>,
    /// Sender address for outgoing mail.
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    /// Active entries older than this are expired by the sweep.
    #[serde(default = "default_entry_max_age_days")]
    pub entry_max_age_days: i64,
    /// Expired entries are deleted this long after they expired.
    #[serde(default = "default_expired_retention_days")]
    pub expired_retention_days: i64,
    #[serde(default = "default_expiry_sweep_interval_secs")]
    pub expiry_sweep_interval_secs: u64,
    #[serde(default = "default_outbox_poll_interval_secs")]
    pub outbox_poll_interval_secs: u64,
}

impl Config for StorageConfig {}

fn default_storage_port() -> u16 {
    3114
}

fn default_mail_from() -> String {
    "noreply@sanrakshan.local".to_owned()
}

fn default_entry_max_age_days() -> i64 {
    180
}

fn default_expired_retention_days() -> i64 {
    365
}

fn default_expiry_sweep_interval_secs() -> u64 {
    3600
}

fn default_outbox_poll_interval_secs() -> u64 {
    5
}
