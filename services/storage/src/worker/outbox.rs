use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;

use crate::state::AppState;
use crate::usecase::outbox::DeliverOutboxUseCase;

/// Poll due outbox events forever. Failures are logged; the loop never exits.
pub async fn run(state: AppState, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!(interval_secs = every.as_secs(), "outbox worker started");

    loop {
        ticker.tick().await;
        let usecase = DeliverOutboxUseCase {
            outbox: state.outbox_repo(),
            sender: state.mailer.clone(),
        };
        match usecase.execute(Utc::now()).await {
            Ok(report) => {
                if report.sent + report.retried + report.failed > 0 {
                    tracing::info!(
                        sent = report.sent,
                        retried = report.retried,
                        failed = report.failed,
                        "outbox batch delivered"
                    );
                }
            }
            Err(e) => tracing::error!(error = ?e, "outbox worker tick failed"),
        }
    }
}
