//! Balance query and transfer handlers

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiResponse, error_codes};
use crate::balance::BalanceError;
use crate::money::Amount;
use crate::user_auth::Claims;

/// Transfer request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Account receiving the funds
    #[schema(example = 1002)]
    pub recipient_id: i64,
    /// Positive amount with at most 2 decimal places
    #[schema(value_type = String, example = "25.50")]
    pub amount: Amount,
}

/// Balance response data
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceData {
    pub account_id: i64,
    /// Balance as a string to preserve 2-decimal formatting
    #[schema(example = "974.50")]
    pub balance: String,
}

fn balance_error(e: &BalanceError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = match e {
        BalanceError::SelfTransfer => error_codes::SELF_TRANSFER,
        BalanceError::InsufficientFunds => error_codes::INSUFFICIENT_FUNDS,
        BalanceError::SenderNotFound
        | BalanceError::RecipientNotFound
        | BalanceError::NotFound => error_codes::ACCOUNT_NOT_FOUND,
        BalanceError::Database(_) => error_codes::INTERNAL_ERROR,
    };
    let msg = match e {
        // Never leak database details to the client
        BalanceError::Database(_) => "Internal server error".to_string(),
        other => other.to_string(),
    };
    (status, Json(ApiResponse::<()>::error(code, msg)))
}

/// Get own balance
///
/// GET /api/v1/balance
#[utoipa::path(
    get,
    path = "/api/v1/balance",
    responses(
        (status = 200, description = "Current balance", body = ApiResponse<BalanceData>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Balance"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<(StatusCode, Json<ApiResponse<BalanceData>>), (StatusCode, Json<ApiResponse<()>>)> {
    let account_id = claims.account_id().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                error_codes::AUTH_FAILED,
                "Invalid token subject",
            )),
        )
    })?;

    match state.balance.get_balance(account_id).await {
        Ok(balance) => Ok((
            StatusCode::OK,
            Json(ApiResponse::success(BalanceData {
                account_id,
                balance: balance.to_string(),
            })),
        )),
        Err(e) => Err(balance_error(&e)),
    }
}

/// Transfer money to another account
///
/// POST /api/v1/balance/transfer
#[utoipa::path(
    post,
    path = "/api/v1/balance/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed; returns the sender's new balance", body = ApiResponse<BalanceData>),
        (status = 400, description = "Self transfer, bad amount, or insufficient funds"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sender or recipient not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Balance"
)]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<TransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BalanceData>>), (StatusCode, Json<ApiResponse<()>>)> {
    let sender_id = claims.account_id().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                error_codes::AUTH_FAILED,
                "Invalid token subject",
            )),
        )
    })?;

    match state
        .balance
        .transfer(sender_id, req.recipient_id, req.amount)
        .await
    {
        Ok(new_balance) => Ok((
            StatusCode::OK,
            Json(ApiResponse::success(BalanceData {
                account_id: sender_id,
                balance: new_balance.to_string(),
            })),
        )),
        Err(e) => Err(balance_error(&e)),
    }
}
