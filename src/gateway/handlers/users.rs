//! Account CRUD handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::super::state::AppState;
use super::super::types::{ApiResponse, error_codes};
use crate::account::{Account, ProfileUpdate, StoreError};

const DEFAULT_PAGE_LIMIT: u32 = 10;
const MAX_PAGE_LIMIT: u32 = 100;

/// Account as exposed over the API (no password hash)
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub age: i32,
    pub bio: Option<String>,
    /// Balance as a string to preserve 2-decimal formatting
    #[schema(example = "100.00")]
    pub balance: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            username: a.username,
            email: a.email,
            age: a.age,
            bio: a.bio,
            balance: a.balance.to_string(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// One page of accounts
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountPageView {
    pub accounts: Vec<AccountView>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

/// List query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size, 1 to 100
    pub limit: Option<u32>,
    /// Substring filter on username
    pub username: Option<String>,
}

/// Profile update body; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(range(min = 18, message = "age must be at least 18"))]
    pub age: Option<i32>,
    #[validate(length(max = 1000, message = "bio must be at most 1000 characters"))]
    pub bio: Option<String>,
}

fn store_error(e: &StoreError) -> (StatusCode, Json<ApiResponse<()>>) {
    match e {
        StoreError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(
                error_codes::ACCOUNT_NOT_FOUND,
                "Account not found",
            )),
        ),
        StoreError::Duplicate => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(
                error_codes::DUPLICATE_RESOURCE,
                "Resource already exists",
            )),
        ),
        other => {
            tracing::error!("Store error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTERNAL_ERROR,
                    "Internal server error",
                )),
            )
        }
    }
}

/// List accounts with pagination
///
/// GET /api/v1/users?page=1&limit=10&username=ali
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of accounts", body = ApiResponse<AccountPageView>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt_auth" = [])),
    tag = "Users"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<(StatusCode, Json<ApiResponse<AccountPageView>>), (StatusCode, Json<ApiResponse<()>>)>
{
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);

    if page < 1 || limit < 1 || limit > MAX_PAGE_LIMIT {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                "page must be >= 1 and limit must be between 1 and 100",
            )),
        ));
    }

    match state
        .store
        .list_active(page, limit, query.username.as_deref())
        .await
    {
        Ok(result) => Ok((
            StatusCode::OK,
            Json(ApiResponse::success(AccountPageView {
                accounts: result.accounts.into_iter().map(AccountView::from).collect(),
                total: result.total,
                page: result.page,
                limit: result.limit,
            })),
        )),
        Err(e) => Err(store_error(&e)),
    }
}

/// Get one account by id
///
/// GET /api/v1/users/{id}
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(
        ("id" = i64, Path, description = "Account id")
    ),
    responses(
        (status = 200, description = "Account found", body = ApiResponse<AccountView>),
        (status = 404, description = "Account not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt_auth" = [])),
    tag = "Users"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<AccountView>>), (StatusCode, Json<ApiResponse<()>>)> {
    match state.store.find_active(id).await {
        Ok(Some(account)) => Ok((
            StatusCode::OK,
            Json(ApiResponse::success(AccountView::from(account))),
        )),
        Ok(None) => Err(store_error(&StoreError::NotFound)),
        Err(e) => Err(store_error(&e)),
    }
}

/// Update account profile
///
/// PATCH /api/v1/users/{id}
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(
        ("id" = i64, Path, description = "Account id")
    ),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated account", body = ApiResponse<AccountView>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Account not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt_auth" = [])),
    tag = "Users"
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountView>>), (StatusCode, Json<ApiResponse<()>>)> {
    if let Err(e) = req.validate() {
        let msg = e
            .field_errors()
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Invalid input".to_string());
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(error_codes::INVALID_PARAMETER, msg)),
        ));
    }

    let update = ProfileUpdate {
        age: req.age,
        bio: req.bio,
    };

    match state.store.update_profile(id, update).await {
        Ok(account) => Ok((
            StatusCode::OK,
            Json(ApiResponse::success(AccountView::from(account))),
        )),
        Err(e) => Err(store_error(&e)),
    }
}

/// Soft-delete an account
///
/// DELETE /api/v1/users/{id}
///
/// The row is kept but excluded from all queries and balance operations.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(
        ("id" = i64, Path, description = "Account id")
    ),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 404, description = "Account not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt_auth" = [])),
    tag = "Users"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), (StatusCode, Json<ApiResponse<()>>)> {
    match state.store.soft_delete(id).await {
        Ok(()) => Ok((StatusCode::OK, Json(ApiResponse::success(())))),
        Err(e) => Err(store_error(&e)),
    }
}
