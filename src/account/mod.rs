//! Account management module
//!
//! PostgreSQL-backed storage for user accounts and their balances.

pub mod models;
pub mod store;

// Re-export commonly used types
pub use models::{Account, AccountPage, NewAccount, ProfileUpdate};
pub use store::{AccountStore, MemoryAccountStore, PgAccountStore, StoreError};
