//! Job queue types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Lifecycle state of a queued job
///
/// `waiting -> active -> {completed | failed}`; a failed attempt transitions
/// back to `active` on automatic retry until attempts are exhausted.
/// `not_found` is a synthetic state for ids the queue no longer knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Waiting,
    Active,
    Completed,
    Failed,
    NotFound,
}

/// Per-job queue options (retry and retention policy)
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Maximum delivery attempts (including the first)
    pub attempts: u32,
    /// Initial backoff delay; doubles after each failed attempt
    pub backoff_ms: u64,
    /// Keep at most this many completed job records
    pub keep_completed: usize,
    /// Keep at most this many failed job records
    pub keep_failed: usize,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            attempts: 1,
            backoff_ms: 0,
            keep_completed: 10,
            keep_failed: 5,
        }
    }
}

/// Point-in-time view of a job, mirrored verbatim from queue state
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobSnapshot {
    pub id: String,
    pub status: JobStatus,
    /// Completion percentage 0-100
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_reason: Option<String>,
    pub attempts_made: u32,
}

/// Internal job record held by the queue
#[derive(Debug, Clone)]
pub(crate) struct JobRecord {
    pub id: String,
    pub job_type: String,
    pub payload: Value,
    pub opts: JobOptions,
    pub status: JobStatus,
    pub progress: u8,
    pub attempts_made: u32,
    pub result: Option<Value>,
    pub failed_reason: Option<String>,
}

impl JobRecord {
    pub(crate) fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id.clone(),
            status: self.status,
            progress: self.progress,
            result: self.result.clone(),
            failed_reason: self.failed_reason.clone(),
            attempts_made: self.attempts_made,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::NotFound).unwrap(),
            r#""not_found""#
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Waiting).unwrap(),
            r#""waiting""#
        );
    }

    #[test]
    fn test_snapshot_omits_empty_result() {
        let record = JobRecord {
            id: "1".to_string(),
            job_type: "test".to_string(),
            payload: Value::Null,
            opts: JobOptions::default(),
            status: JobStatus::Waiting,
            progress: 0,
            attempts_made: 0,
            result: None,
            failed_reason: None,
        };
        let json = serde_json::to_value(record.snapshot()).unwrap();
        assert!(json.get("result").is_none());
        assert!(json.get("failed_reason").is_none());
        assert_eq!(json["status"], "waiting");
    }
}
