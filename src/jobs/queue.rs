//! In-process job queue with retry, backoff and retention
//!
//! A single worker task consumes jobs one at a time (concurrency 1), retries
//! failed handlers with exponential backoff, and evicts old completed/failed
//! records per the per-job retention policy. Handlers are registered
//! explicitly with [`JobQueue::register_handler`] before the worker starts.

use dashmap::DashMap;
use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tracing::{error, info, warn};

use super::types::{JobOptions, JobRecord, JobSnapshot, JobStatus};

/// Async job handler: receives a context for progress reporting and the
/// job payload, returns the job result on success.
pub type JobHandler =
    Arc<dyn Fn(JobContext, Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

#[derive(Error, Debug)]
pub enum QueueError {
    /// The queue cannot accept new jobs (worker shut down)
    #[error("queue unavailable")]
    Unavailable,
}

/// Handle passed to handlers for reporting progress on the running job
#[derive(Clone)]
pub struct JobContext {
    id: String,
    jobs: Arc<DashMap<String, JobRecord>>,
}

impl JobContext {
    /// Job id being processed
    pub fn job_id(&self) -> &str {
        &self.id
    }

    /// Set the job's progress percentage (clamped to 100)
    pub fn set_progress(&self, percent: u8) {
        if let Some(mut record) = self.jobs.get_mut(&self.id) {
            record.progress = percent.min(100);
        }
    }
}

pub struct JobQueue {
    jobs: Arc<DashMap<String, JobRecord>>,
    handlers: RwLock<HashMap<String, JobHandler>>,
    tx: mpsc::UnboundedSender<String>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    next_id: AtomicU64,
    closed: AtomicBool,
    completed: Mutex<VecDeque<String>>,
    failed: Mutex<VecDeque<String>>,
}

impl JobQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            jobs: Arc::new(DashMap::new()),
            handlers: RwLock::new(HashMap::new()),
            tx,
            rx: Mutex::new(Some(rx)),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
            completed: Mutex::new(VecDeque::new()),
            failed: Mutex::new(VecDeque::new()),
        }
    }

    /// Register the handler for a job type. Called once at startup.
    pub fn register_handler(&self, job_type: &str, handler: JobHandler) {
        info!(job_type, "Job handler registered");
        self.handlers
            .write()
            .unwrap()
            .insert(job_type.to_string(), handler);
    }

    /// Enqueue a job and return its id.
    ///
    /// Fails with [`QueueError::Unavailable`] when the worker has shut down.
    pub fn enqueue(
        &self,
        job_type: &str,
        payload: Value,
        opts: JobOptions,
    ) -> Result<String, QueueError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QueueError::Unavailable);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let record = JobRecord {
            id: id.clone(),
            job_type: job_type.to_string(),
            payload,
            opts,
            status: JobStatus::Waiting,
            progress: 0,
            attempts_made: 0,
            result: None,
            failed_reason: None,
        };
        self.jobs.insert(id.clone(), record);

        if self.tx.send(id.clone()).is_err() {
            // Worker gone; do not leave a zombie waiting record behind
            self.jobs.remove(&id);
            return Err(QueueError::Unavailable);
        }

        info!(job_id = %id, job_type, "Job enqueued");
        Ok(id)
    }

    /// Live state of a job, or `None` if the id is unknown or evicted
    pub fn get_job(&self, id: &str) -> Option<JobSnapshot> {
        self.jobs.get(id).map(|r| r.snapshot())
    }

    /// Stop accepting new jobs. In-flight processing is unaffected.
    /// Effective whether or not the worker has started.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.rx.lock().unwrap().take();
    }

    /// Run the worker loop until the queue is dropped.
    ///
    /// Takes the receiver; panics if called twice.
    pub async fn run_worker(self: Arc<Self>) {
        let mut rx = self
            .rx
            .lock()
            .unwrap()
            .take()
            .expect("worker already running");
        info!("Job queue worker started (concurrency 1)");

        while let Some(job_id) = rx.recv().await {
            self.process(&job_id).await;
        }
        info!("Job queue worker stopped");
    }

    async fn process(&self, job_id: &str) {
        let Some(record) = self.jobs.get(job_id).map(|r| r.clone()) else {
            return; // evicted before processing
        };

        let handler = self
            .handlers
            .read()
            .unwrap()
            .get(&record.job_type)
            .cloned();
        let Some(handler) = handler else {
            warn!(job_id, job_type = %record.job_type, "No handler registered for job");
            self.mark_failed(job_id, "no handler registered", &record.opts);
            return;
        };

        let ctx = JobContext {
            id: job_id.to_string(),
            jobs: self.jobs.clone(),
        };
        let max_attempts = record.opts.attempts.max(1);

        for attempt in 1..=max_attempts {
            if let Some(mut r) = self.jobs.get_mut(job_id) {
                r.status = JobStatus::Active;
                r.attempts_made = attempt;
            }

            match handler(ctx.clone(), record.payload.clone()).await {
                Ok(result) => {
                    if let Some(mut r) = self.jobs.get_mut(job_id) {
                        r.status = JobStatus::Completed;
                        r.result = Some(result);
                        // A failed earlier attempt must not leak into the
                        // completed record
                        r.failed_reason = None;
                    }
                    info!(job_id, attempt, "Job completed");
                    self.retain_completed(job_id, &record.opts);
                    return;
                }
                Err(e) => {
                    error!(job_id, attempt, max_attempts, error = %e, "Job attempt failed");
                    if let Some(mut r) = self.jobs.get_mut(job_id) {
                        r.status = JobStatus::Failed;
                        r.failed_reason = Some(e.to_string());
                    }
                    if attempt < max_attempts {
                        // Exponential backoff: backoff_ms, 2x, 4x, ...
                        let delay = record.opts.backoff_ms.saturating_mul(1 << (attempt - 1));
                        sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }

        // Retries exhausted; the record stays failed until evicted
        self.retain_failed(job_id, &record.opts);
    }

    fn mark_failed(&self, job_id: &str, reason: &str, opts: &JobOptions) {
        if let Some(mut r) = self.jobs.get_mut(job_id) {
            r.status = JobStatus::Failed;
            r.failed_reason = Some(reason.to_string());
        }
        self.retain_failed(job_id, opts);
    }

    fn retain_completed(&self, job_id: &str, opts: &JobOptions) {
        let mut history = self.completed.lock().unwrap();
        history.push_back(job_id.to_string());
        while history.len() > opts.keep_completed {
            if let Some(evicted) = history.pop_front() {
                self.jobs.remove(&evicted);
            }
        }
    }

    fn retain_failed(&self, job_id: &str, opts: &JobOptions) {
        let mut history = self.failed.lock().unwrap();
        history.push_back(job_id.to_string());
        while history.len() > opts.keep_failed {
            if let Some(evicted) = history.pop_front() {
                self.jobs.remove(&evicted);
            }
        }
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}
