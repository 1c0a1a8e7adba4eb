//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:3000/docs`
//! - OpenAPI JSON: `http://localhost:3000/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::admin_balance::{ResetOutcome, ScheduledJob};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::handlers::admin::ResetRequest;
use crate::gateway::handlers::balance::{BalanceData, TransferRequest};
use crate::gateway::handlers::users::{AccountPageView, AccountView, UpdateAccountRequest};
use crate::jobs::{JobSnapshot, JobStatus};
use crate::user_auth::{AuthResponse, LoginRequest, RegisterRequest};

/// JWT bearer authentication security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT issued by POST /api/v1/auth/login, valid for 24 hours",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Balance Gateway API",
        version = "1.0.0",
        description = "Account management backend with peer-to-peer balance transfers and queued mass resets."
    ),
    servers(
        (url = "http://localhost:3000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        crate::gateway::handlers::balance::get_balance,
        crate::gateway::handlers::balance::transfer,
        crate::gateway::handlers::admin::reset_all_balances,
        crate::gateway::handlers::admin::job_status,
        crate::gateway::handlers::users::list_accounts,
        crate::gateway::handlers::users::get_account,
        crate::gateway::handlers::users::update_account,
        crate::gateway::handlers::users::delete_account,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            BalanceData,
            TransferRequest,
            ResetRequest,
            ScheduledJob,
            ResetOutcome,
            JobSnapshot,
            JobStatus,
            AccountView,
            AccountPageView,
            UpdateAccountRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Balance", description = "Balance queries and transfers (auth required)"),
        (name = "Admin", description = "Mass balance reset operations (auth required)"),
        (name = "Users", description = "Account CRUD (auth required)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
