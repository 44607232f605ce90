use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;

use crate::domain::repository::EntryRepository;
use crate::error::StorageServiceError;
use crate::state::AppState;
use crate::usecase::entry::{ExpireStaleUseCase, PurgeExpiredUseCase};

#[derive(Debug, Clone, Copy)]
pub struct Retention {
    /// Active entries older than this many days are expired.
    pub max_age_days: i64,
    /// Expired entries are deleted this many days after expiring.
    pub expired_retention_days: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired: u64,
    pub purged: u64,
}

/// One sweep: expire stale active entries, then purge long-expired ones.
pub async fn sweep<E>(
    entries: E,
    now: DateTime<Utc>,
    retention: Retention,
) -> Result<SweepReport, StorageServiceError>
where
    E: EntryRepository + Clone,
{
    let cutoff = now - chrono::Duration::days(retention.max_age_days);
    let expired = ExpireStaleUseCase {
        entries: entries.clone(),
    }
    .execute(cutoff)
    .await?;

    let before = now - chrono::Duration::days(retention.expired_retention_days);
    let purged = PurgeExpiredUseCase { entries }.execute(before).await?;

    Ok(SweepReport { expired, purged })
}

pub async fn run(state: AppState, every: Duration, retention: Retention) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tracing::info!(
        interval_secs = every.as_secs(),
        max_age_days = retention.max_age_days,
        "expiry worker started"
    );

    loop {
        ticker.tick().await;
        if let Err(e) = sweep(state.entry_repo(), Utc::now(), retention).await {
            tracing::error!(error = ?e, "expiry sweep failed");
        }
    }
}
