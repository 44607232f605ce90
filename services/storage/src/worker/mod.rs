//! Background jobs. Nothing here is reachable from a request handler.

pub mod expiry;
pub mod outbox;

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::StorageConfig;
use crate::state::AppState;

/// Spawn the outbox delivery loop and the expiry sweep.
pub fn spawn_workers(state: &AppState, config: &StorageConfig) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(outbox::run(
            state.clone(),
            Duration::from_secs(config.outbox_poll_interval_secs.max(1)),
        )),
        tokio::spawn(expiry::run(
            state.clone(),
            Duration::from_secs(config.expiry_sweep_interval_secs.max(1)),
            expiry::Retention {
                max_age_days: config.entry_max_age_days,
                expired_retention_days: config.expired_retention_days,
            },
        )),
    ]
}
