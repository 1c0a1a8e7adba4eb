//! Data models for user accounts

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// User account row
///
/// `balance` is stored as `decimal(10,2)`; every mutation goes through
/// [`crate::money::round2`] so it never carries more than 2 fractional digits.
/// Soft-deleted accounts (`is_deleted = true`) are excluded from all balance
/// operations and normal queries.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub age: i32,
    pub bio: Option<String>,
    pub balance: Decimal,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub age: i32,
    pub bio: Option<String>,
}

/// Partial profile update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub age: Option<i32>,
    pub bio: Option<String>,
}

/// One page of active accounts plus the total count
#[derive(Debug)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}
