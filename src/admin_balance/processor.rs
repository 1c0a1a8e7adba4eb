//! Worker side of the balance reset pipeline

use std::sync::Arc;

use crate::jobs::{JobHandler, JobQueue};

use super::service::{AdminBalanceService, ResetJobData, RESET_ALL_BALANCES};

/// Wire the reset handler into the queue.
///
/// Progress goes to 10 once the job is picked up, then straight to 100 on
/// completion. The reset is a single bulk UPDATE so there is no meaningful
/// intermediate progress to report. On failure the progress is pushed back
/// to 0 before the error propagates to the queue's retry loop.
pub fn register_reset_handler(queue: &JobQueue, service: Arc<AdminBalanceService>) {
    let handler: JobHandler = Arc::new(move |ctx, payload| {
        let service = service.clone();
        Box::pin(async move {
            let data: ResetJobData = serde_json::from_value(payload)?;
            tracing::info!(
                job_id = %ctx.job_id(),
                admin_id = data.admin_id,
                reason = data.reason.as_deref().unwrap_or("none"),
                "Processing balance reset job"
            );

            ctx.set_progress(10);

            match service.reset_all_balances().await {
                Ok(outcome) => {
                    ctx.set_progress(100);
                    Ok(serde_json::to_value(outcome)?)
                }
                Err(e) => {
                    tracing::error!(job_id = %ctx.job_id(), error = %e, "Balance reset job failed");
                    ctx.set_progress(0);
                    Err(e.into())
                }
            }
        })
    });

    queue.register_handler(RESET_ALL_BALANCES, handler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryAccountStore;
    use crate::config::ResetQueueConfig;
    use crate::jobs::{JobSnapshot, JobStatus};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::time::Duration;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn wait_for_terminal(queue: &JobQueue, job_id: &str) -> JobSnapshot {
        for _ in 0..200 {
            if let Some(snap) = queue.get_job(job_id) {
                if matches!(snap.status, JobStatus::Completed | JobStatus::Failed) {
                    return snap;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {} did not reach a terminal state", job_id);
    }

    #[tokio::test]
    async fn test_end_to_end_reset_job() {
        let store = Arc::new(MemoryAccountStore::new());
        let a = store.insert_with_balance("alice", dec("500.00"));
        let b = store.insert_with_balance("bob", dec("12.34"));

        let queue = Arc::new(JobQueue::new());
        let service = Arc::new(AdminBalanceService::new(
            queue.clone(),
            store.clone(),
            ResetQueueConfig::default(),
        ));
        register_reset_handler(&queue, service.clone());
        tokio::spawn(queue.clone().run_worker());

        let scheduled = service.schedule_reset(7, None).unwrap();
        let snap = wait_for_terminal(&queue, &scheduled.job_id).await;

        assert_eq!(snap.status, JobStatus::Completed);
        assert_eq!(snap.progress, 100);
        let result = snap.result.unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["accounts_processed"], 2);
        assert_eq!(store.balance_of(a).unwrap(), dec("0"));
        assert_eq!(store.balance_of(b).unwrap(), dec("0"));
    }

    #[tokio::test]
    async fn test_status_endpoint_view_of_completed_job() {
        let store = Arc::new(MemoryAccountStore::new());
        store.insert_with_balance("alice", dec("1.00"));

        let queue = Arc::new(JobQueue::new());
        let service = Arc::new(AdminBalanceService::new(
            queue.clone(),
            store,
            ResetQueueConfig::default(),
        ));
        register_reset_handler(&queue, service.clone());
        tokio::spawn(queue.clone().run_worker());

        let scheduled = service.schedule_reset(1, Some("audit".to_string())).unwrap();
        wait_for_terminal(&queue, &scheduled.job_id).await;

        let snap = service.job_status(&scheduled.job_id);
        assert_eq!(snap.status, JobStatus::Completed);
        assert!(snap.failed_reason.is_none());
    }
}
