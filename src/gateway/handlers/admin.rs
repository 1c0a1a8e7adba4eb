//! Admin handlers: mass balance reset and job status

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiResponse, error_codes};
use crate::admin_balance::{AdminBalanceError, ScheduledJob};
use crate::jobs::JobSnapshot;
use crate::user_auth::Claims;

/// Optional body for the reset endpoint
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResetRequest {
    /// Free-form reason recorded on the job
    #[schema(example = "Monthly reconciliation")]
    pub reason: Option<String>,
}

/// Schedule a reset of every active account balance to 0.00
///
/// POST /api/v1/admin/balance/reset-all
///
/// The reset runs asynchronously; poll the returned job id for progress.
#[utoipa::path(
    post,
    path = "/api/v1/admin/balance/reset-all",
    request_body = ResetRequest,
    responses(
        (status = 202, description = "Job accepted", body = ApiResponse<ScheduledJob>),
        (status = 400, description = "Job queue unavailable"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt_auth" = [])),
    tag = "Admin"
)]
pub async fn reset_all_balances(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Option<Json<ResetRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ScheduledJob>>), (StatusCode, Json<ApiResponse<()>>)> {
    let admin_id = claims.account_id().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                error_codes::AUTH_FAILED,
                "Invalid token subject",
            )),
        )
    })?;

    let reason = body.and_then(|Json(b)| b.reason);

    match state.admin_balance.schedule_reset(admin_id, reason) {
        Ok(scheduled) => Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(scheduled)))),
        Err(e @ AdminBalanceError::QueueUnavailable) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::QUEUE_UNAVAILABLE,
                e.to_string(),
            )),
        )),
        Err(e) => {
            tracing::error!("Failed to schedule reset: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTERNAL_ERROR,
                    "Failed to schedule balance reset job",
                )),
            ))
        }
    }
}

/// Check the status of a balance reset job
///
/// GET /api/v1/admin/balance/job/{job_id}
///
/// Always returns 200; unknown ids come back with status `not_found`.
#[utoipa::path(
    get,
    path = "/api/v1/admin/balance/job/{job_id}",
    params(
        ("job_id" = String, Path, description = "Job id returned by reset-all")
    ),
    responses(
        (status = 200, description = "Job status", body = ApiResponse<JobSnapshot>),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt_auth" = [])),
    tag = "Admin"
)]
pub async fn job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> (StatusCode, Json<ApiResponse<JobSnapshot>>) {
    let snapshot = state.admin_balance.job_status(&job_id);
    (StatusCode::OK, Json(ApiResponse::success(snapshot)))
}
