//! HTTP gateway: routing, shared state, request/response types

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use anyhow::Context;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::user_auth::jwt_auth_middleware;
use crate::websocket::ws_handler;
use state::AppState;

/// Build the full application router.
///
/// Split from [`run_server`] so tests can drive the router without
/// binding a socket.
pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(crate::user_auth::handlers::register))
        .route("/login", post(crate::user_auth::handlers::login));

    // Everything below requires a valid JWT
    let balance_routes = Router::new()
        .route("/", get(handlers::get_balance))
        .route("/transfer", post(handlers::transfer))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let admin_routes = Router::new()
        .route("/balance/reset-all", post(handlers::reset_all_balances))
        .route("/balance/job/{job_id}", get(handlers::job_status))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let user_routes = Router::new()
        .route("/", get(handlers::list_accounts))
        .route(
            "/{id}",
            patch(handlers::update_account)
                .get(handlers::get_account)
                .delete(handlers::delete_account),
        )
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/balance", balance_routes)
        .nest("/api/v1/admin", admin_routes)
        .nest("/api/v1/users", user_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("API docs: http://{}/docs", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
