pub mod response;

pub use response::{error_codes, ApiResponse};
