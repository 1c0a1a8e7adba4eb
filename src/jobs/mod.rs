//! Generic in-process job queue
//!
//! Bull-style surface: enqueue with retry/retention options, poll job state,
//! explicit handler registration, single background worker.

pub mod queue;
pub mod types;

pub use queue::{JobContext, JobHandler, JobQueue, QueueError};
pub use types::{JobOptions, JobSnapshot, JobStatus};
