use std::sync::Arc;

use crate::account::AccountStore;
use crate::admin_balance::AdminBalanceService;
use crate::balance::BalanceService;
use crate::db::Database;
use crate::user_auth::UserAuthService;
use crate::websocket::ConnectionManager;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    /// Account persistence (backs every other service)
    pub store: Arc<dyn AccountStore>,
    /// Balance queries and peer-to-peer transfers
    pub balance: Arc<BalanceService>,
    /// Mass reset dispatch and job status
    pub admin_balance: Arc<AdminBalanceService>,
    /// Registration, login, token verification
    pub user_auth: Arc<UserAuthService>,
    /// WebSocket connection registry
    pub ws_manager: Arc<ConnectionManager>,
    /// Raw database handle, used by the health check. `None` when running
    /// against an in-memory store in tests.
    pub db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AccountStore>,
        balance: Arc<BalanceService>,
        admin_balance: Arc<AdminBalanceService>,
        user_auth: Arc<UserAuthService>,
        ws_manager: Arc<ConnectionManager>,
        db: Option<Arc<Database>>,
    ) -> Self {
        Self {
            store,
            balance,
            admin_balance,
            user_auth,
            ws_manager,
            db,
        }
    }
}
