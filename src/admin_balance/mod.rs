pub mod processor;
pub mod service;

pub use processor::register_reset_handler;
pub use service::{
    AdminBalanceError, AdminBalanceService, ResetJobData, ResetOutcome, ScheduledJob,
    RESET_ALL_BALANCES,
};
