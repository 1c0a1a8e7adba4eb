//! Balance subsystem: transfer service and error taxonomy

pub mod error;
pub mod service;

pub use error::BalanceError;
pub use service::BalanceService;
