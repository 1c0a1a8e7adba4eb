//! Balance Gateway - account management backend
//!
//! A CRUD backend with a money subsystem: JWT-authenticated accounts,
//! peer-to-peer balance transfers, and queued mass balance resets.
//!
//! # Modules
//!
//! - [`account`] - Account models and the persistence trait
//! - [`balance`] - Balance queries and peer-to-peer transfers
//! - [`jobs`] - In-process job queue with retries and retention
//! - [`admin_balance`] - Mass reset dispatch, status, and worker
//! - [`user_auth`] - Registration, login, JWT verification
//! - [`gateway`] - HTTP routing and request/response types
//! - [`websocket`] - Real-time notification channel
//! - [`money`] - Strict 2-decimal amount handling

pub mod account;
pub mod admin_balance;
pub mod balance;
pub mod config;
pub mod db;
pub mod gateway;
pub mod jobs;
pub mod logging;
pub mod money;
pub mod user_auth;
pub mod websocket;

// Convenient re-exports at crate root
pub use account::{Account, AccountStore, MemoryAccountStore, PgAccountStore, StoreError};
pub use admin_balance::{AdminBalanceService, ResetOutcome};
pub use balance::{BalanceError, BalanceService};
pub use config::AppConfig;
pub use db::Database;
pub use jobs::{JobQueue, JobSnapshot, JobStatus};
pub use money::{Amount, round2};
pub use user_auth::UserAuthService;
