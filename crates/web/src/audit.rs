//! Best-effort audit recording. A failed audit write must never fail the
//! mutation it describes, but the entry is not allowed to vanish either:
//! failures are queued and retried in the background until they land or run
//! out of attempts.

use std::time::Duration;

use storage::dto::audit::NewAuditLog;
use storage::repository::audit_log::AuditLogRepository;
use storage::Database;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const MAX_ATTEMPTS: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct PendingAudit {
    pub entry: NewAuditLog,
    pub attempts: u32,
}

#[derive(Clone)]
pub struct AuditRecorder {
    db: Database,
    retry_tx: mpsc::UnboundedSender<PendingAudit>,
}

impl AuditRecorder {
    pub fn new(db: Database) -> (Self, mpsc::UnboundedReceiver<PendingAudit>) {
        let (retry_tx, retry_rx) = mpsc::unbounded_channel();
        (Self { db, retry_tx }, retry_rx)
    }

    pub fn retry_sender(&self) -> mpsc::UnboundedSender<PendingAudit> {
        self.retry_tx.clone()
    }

    /// Append one audit entry. On failure the mutation's success stands; the
    /// entry goes to the retry queue and the gap is logged for operators.
    pub async fn record(&self, entry: NewAuditLog) {
        let repo = AuditLogRepository::new(self.db.pool());
        match repo.insert(&entry).await {
            Ok(inserted) => {
                debug!(id = inserted.id, action = %inserted.action, "audit entry written");
            }
            Err(e) => {
                warn!(
                    action = %entry.action,
                    coach = %entry.coach_email,
                    error = %e,
                    "Failed to create audit log entry; queued for retry"
                );
                let _ = self.retry_tx.send(PendingAudit { entry, attempts: 1 });
            }
        }
    }
}

/// Background loop draining the retry queue. Spawned once at startup.
pub async fn run_retry_worker(
    db: Database,
    retry_tx: mpsc::UnboundedSender<PendingAudit>,
    mut retry_rx: mpsc::UnboundedReceiver<PendingAudit>,
) {
    while let Some(pending) = retry_rx.recv().await {
        tokio::time::sleep(RETRY_DELAY).await;

        let repo = AuditLogRepository::new(db.pool());
        match repo.insert(&pending.entry).await {
            Ok(inserted) => {
                info!(
                    id = inserted.id,
                    attempts = pending.attempts + 1,
                    "audit entry recovered on retry"
                );
            }
            Err(e) if pending.attempts < MAX_ATTEMPTS => {
                warn!(
                    attempts = pending.attempts,
                    error = %e,
                    "audit retry failed; requeueing"
                );
                let _ = retry_tx.send(PendingAudit {
                    entry: pending.entry,
                    attempts: pending.attempts + 1,
                });
            }
            Err(e) => {
                error!(
                    action = %pending.entry.action,
                    coach = %pending.entry.coach_email,
                    error = %e,
                    "audit entry dropped after {MAX_ATTEMPTS} attempts"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storage::models::AuditAction;
    use uuid::Uuid;

    fn entry() -> NewAuditLog {
        NewAuditLog::new(
            AuditAction::Register,
            json!({ "full_name": "Ann Lee" }),
            Uuid::new_v4(),
            "sensei@eagles.example",
            "Eagles",
        )
    }

    #[tokio::test]
    async fn record_failure_queues_instead_of_failing() {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        // Close the pool so the insert fails.
        db.pool().close().await;

        let (recorder, mut retry_rx) = AuditRecorder::new(db);
        recorder.record(entry()).await;

        let pending = retry_rx.try_recv().expect("entry should be queued for retry");
        assert_eq!(pending.attempts, 1);
        assert_eq!(pending.entry.action, AuditAction::Register);
    }

    #[tokio::test]
    async fn record_success_does_not_queue() {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();

        let (recorder, mut retry_rx) = AuditRecorder::new(db);
        recorder.record(entry()).await;

        assert!(retry_rx.try_recv().is_err());
    }
}
