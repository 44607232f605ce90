use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::domain::repository::{EmailSender, OutboxRepository};
use crate::domain::types::{
    EmailMessage, MAX_DELIVERY_ATTEMPTS, OUTBOX_BATCH_SIZE, OUTBOX_RETRY_STEP_SECS,
    PASSWORD_RESET_REQUESTED, PendingOutboxEvent, RESET_CODE_TTL_SECS,
};
use crate::error::StorageServiceError;

#[derive(Deserialize)]
struct PasswordResetPayload {
    email: String,
    name: String,
    code: String,
}

/// Turn an outbox row into the email it stands for.
fn render(event: &PendingOutboxEvent) -> Result<EmailMessage, StorageServiceError> {
    match event.kind.as_str() {
        PASSWORD_RESET_REQUESTED => {
            let p: PasswordResetPayload = serde_json::from_value(event.payload.clone())
                .map_err(|e| anyhow::anyhow!("malformed {PASSWORD_RESET_REQUESTED} payload: {e}"))?;
            Ok(EmailMessage {
                to: p.email,
                subject: "Sanrakshan password reset code".to_owned(),
                body: format!(
                    "Hello {},\n\nYour password reset code is {}. It expires in {} minutes.\n\n\
                     If you did not ask for a reset, ignore this email.\n",
                    p.name,
                    p.code,
                    RESET_CODE_TTL_SECS / 60
                ),
            })
        }
        other => Err(anyhow::anyhow!("unknown outbox event kind {other:?}").into()),
    }
}

fn describe(err: &StorageServiceError) -> String {
    match err {
        StorageServiceError::Internal(e) => format!("{e:#}"),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: u32,
    pub retried: u32,
    pub failed: u32,
}

/// Deliver due outbox events. Failures back off linearly and give up after
/// `MAX_DELIVERY_ATTEMPTS`.
pub struct DeliverOutboxUseCase<O, S>
where
    O: OutboxRepository,
    S: EmailSender,
{
    pub outbox: O,
    pub sender: S,
}

impl<O, S> DeliverOutboxUseCase<O, S>
where
    O: OutboxRepository,
    S: EmailSender,
{
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<DeliveryReport, StorageServiceError> {
        let mut report = DeliveryReport::default();
        for event in self.outbox.fetch_due(now, OUTBOX_BATCH_SIZE).await? {
            let result = match render(&event) {
                Ok(message) => self.sender.send(&message).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    self.outbox.mark_processed(event.id, now).await?;
                    report.sent += 1;
                }
                Err(e) => {
                    let attempts = event.attempts + 1;
                    let error = describe(&e);
                    if attempts >= MAX_DELIVERY_ATTEMPTS {
                        tracing::error!(event_id = %event.id, kind = %event.kind, attempts, %error, "outbox delivery failed permanently");
                        self.outbox
                            .mark_failed(event.id, attempts, &error, now)
                            .await?;
                        report.failed += 1;
                    } else {
                        let next = now + Duration::seconds(OUTBOX_RETRY_STEP_SECS * i64::from(attempts));
                        tracing::warn!(event_id = %event.id, kind = %event.kind, attempts, %error, "outbox delivery failed, will retry");
                        self.outbox
                            .mark_retry(event.id, attempts, &error, next)
                            .await?;
                        report.retried += 1;
                    }
                }
            }
        }
        Ok(report)
    }
}
