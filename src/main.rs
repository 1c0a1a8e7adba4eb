//! Balance Gateway entry point
//!
//! Startup order:
//!
//! 1. Load config/{env}.yaml and initialize logging
//! 2. Connect PostgreSQL and build the account store
//! 3. Wire services, register the reset worker, spawn the queue
//! 4. Serve HTTP + WebSocket

use std::sync::Arc;

use balance_gateway::account::PgAccountStore;
use balance_gateway::admin_balance::{AdminBalanceService, register_reset_handler};
use balance_gateway::balance::BalanceService;
use balance_gateway::config::AppConfig;
use balance_gateway::db::Database;
use balance_gateway::gateway::{run_server, state::AppState};
use balance_gateway::jobs::JobQueue;
use balance_gateway::logging::init_logging;
use balance_gateway::user_auth::UserAuthService;
use balance_gateway::websocket::ConnectionManager;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = init_logging(&config);

    tracing::info!(env = %env, "Starting balance gateway");

    let db = Arc::new(Database::connect(&config.postgres_url).await?);
    let store = Arc::new(PgAccountStore::new(db.pool().clone()));

    let balance = Arc::new(BalanceService::new(store.clone()));
    let user_auth = Arc::new(UserAuthService::new(
        store.clone(),
        config.jwt_secret.clone(),
    ));

    let queue = Arc::new(JobQueue::new());
    let admin_balance = Arc::new(AdminBalanceService::new(
        queue.clone(),
        store.clone(),
        config.reset_queue.clone(),
    ));
    register_reset_handler(&queue, admin_balance.clone());
    tokio::spawn(queue.clone().run_worker());
    tracing::info!("Reset job worker started");

    let ws_manager = Arc::new(ConnectionManager::new());

    let state = Arc::new(AppState::new(
        store,
        balance,
        admin_balance,
        user_auth,
        ws_manager,
        Some(db),
    ));

    run_server(&config.gateway.host, config.gateway.port, state).await
}
