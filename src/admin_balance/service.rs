//! Admin balance operations: mass reset scheduling, execution, status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use utoipa::ToSchema;

use crate::account::{AccountStore, StoreError};
use crate::config::ResetQueueConfig;
use crate::jobs::{JobOptions, JobQueue, JobSnapshot, JobStatus};

/// Job type consumed by the reset worker
pub const RESET_ALL_BALANCES: &str = "reset-all-balances";

/// Payload carried by a reset job
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetJobData {
    pub admin_id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Outcome of a completed mass reset
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResetOutcome {
    pub success: bool,
    pub accounts_processed: u64,
    pub duration_ms: u64,
    pub message: String,
}

/// Handle returned when a reset job is accepted
#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduledJob {
    pub job_id: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AdminBalanceError {
    /// Queue cannot accept the job; message is deliberately generic so no
    /// infrastructure details leak to the caller
    #[error("Failed to schedule balance reset job")]
    QueueUnavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub struct AdminBalanceService {
    queue: Arc<JobQueue>,
    store: Arc<dyn AccountStore>,
    queue_cfg: ResetQueueConfig,
}

impl AdminBalanceService {
    pub fn new(
        queue: Arc<JobQueue>,
        store: Arc<dyn AccountStore>,
        queue_cfg: ResetQueueConfig,
    ) -> Self {
        Self {
            queue,
            store,
            queue_cfg,
        }
    }

    /// Enqueue a reset-all-balances job and return its handle.
    pub fn schedule_reset(
        &self,
        admin_id: i64,
        reason: Option<String>,
    ) -> Result<ScheduledJob, AdminBalanceError> {
        let data = ResetJobData {
            admin_id,
            timestamp: Utc::now(),
            reason,
        };
        let payload = serde_json::to_value(&data)
            .map_err(|e| AdminBalanceError::Internal(e.to_string()))?;
        let opts = JobOptions {
            attempts: self.queue_cfg.attempts,
            backoff_ms: self.queue_cfg.backoff_ms,
            keep_completed: self.queue_cfg.keep_completed,
            keep_failed: self.queue_cfg.keep_failed,
        };

        let job_id = self
            .queue
            .enqueue(RESET_ALL_BALANCES, payload, opts)
            .map_err(|e| {
                tracing::error!(admin_id, error = %e, "Failed to enqueue balance reset job");
                AdminBalanceError::QueueUnavailable
            })?;

        tracing::info!(job_id = %job_id, admin_id, "Balance reset job scheduled");
        Ok(ScheduledJob {
            job_id,
            message: "Balance reset job has been scheduled".to_string(),
        })
    }

    /// Live status of a reset job.
    ///
    /// Unknown or evicted ids yield a synthetic `not_found` snapshot instead
    /// of an error, so polling is idempotent and side-effect-free.
    pub fn job_status(&self, job_id: &str) -> JobSnapshot {
        self.queue.get_job(job_id).unwrap_or_else(|| JobSnapshot {
            id: job_id.to_string(),
            status: JobStatus::NotFound,
            progress: 0,
            result: None,
            failed_reason: Some("Job not found".to_string()),
            attempts_made: 0,
        })
    }

    /// Perform the mass reset: zero the balance of every non-deleted account.
    ///
    /// Zero active accounts is a success with nothing processed, skipping the
    /// write entirely. Resetting to zero is idempotent, which is what makes
    /// at-least-once job delivery safe for this operation.
    pub async fn reset_all_balances(&self) -> Result<ResetOutcome, StoreError> {
        let started = Instant::now();

        let active = self.store.count_active().await?;
        if active == 0 {
            tracing::warn!("Mass balance reset: no active accounts found");
            return Ok(ResetOutcome {
                success: true,
                accounts_processed: 0,
                duration_ms: started.elapsed().as_millis() as u64,
                message: "No active accounts found to reset".to_string(),
            });
        }

        let processed = self.store.reset_all_balances().await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            expected = active,
            processed,
            duration_ms,
            "Mass balance reset completed"
        );

        Ok(ResetOutcome {
            success: true,
            accounts_processed: processed,
            duration_ms,
            message: format!("Successfully reset balances for {} accounts", processed),
        })
    }
}
