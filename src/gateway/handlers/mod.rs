pub mod admin;
pub mod balance;
pub mod health;
pub mod users;

pub use admin::{job_status, reset_all_balances};
pub use balance::{get_balance, transfer};
pub use health::{HealthResponse, health_check};
pub use users::{delete_account, get_account, list_accounts, update_account};
