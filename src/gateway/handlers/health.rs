//! Health check handler

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{Json, extract::State, http::StatusCode};
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::ApiResponse;

/// Rate limiter for DB pings that remembers the last verdict.
///
/// Between pings the cached verdict is served, so a failed ping keeps
/// reporting unhealthy until a fresh ping says otherwise.
struct HealthGate {
    last_check_ms: AtomicU64,
    last_healthy: AtomicBool,
}

impl HealthGate {
    const fn new() -> Self {
        Self {
            last_check_ms: AtomicU64::new(0),
            last_healthy: AtomicBool::new(true),
        }
    }

    /// True when the interval has elapsed and a fresh ping is due
    fn ping_due(&self, now_ms: u64, interval_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_check_ms.load(Ordering::Relaxed)) > interval_ms
    }

    fn record(&self, now_ms: u64, healthy: bool) {
        self.last_check_ms.store(now_ms, Ordering::Relaxed);
        self.last_healthy.store(healthy, Ordering::Relaxed);
    }

    fn cached(&self) -> bool {
        self.last_healthy.load(Ordering::Relaxed)
    }
}

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
///
/// Returns service health status with server timestamp.
/// Internally pings the database but does NOT expose any internal
/// details in the response.
///
/// - Healthy: 200 OK + {code: 0, data: {timestamp_ms}}
/// - Unhealthy: 503 Service Unavailable + {code: 503, msg: "unavailable"}
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    // Rate limit: only ping DB once per interval
    static GATE: HealthGate = HealthGate::new();
    const CHECK_INTERVAL_MS: u64 = 5000;

    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let healthy = if GATE.ping_due(now_ms, CHECK_INTERVAL_MS) {
        let fresh = match state.db {
            Some(ref db) => match db.health_check().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("[HEALTH] Database ping failed: {}", e);
                    false
                }
            },
            // In-memory store has no external dependency to check
            None => true,
        };
        GATE.record(now_ms, fresh);
        fresh
    } else {
        GATE.cached()
    };

    if healthy {
        (
            StatusCode::OK,
            Json(ApiResponse::success(HealthResponse {
                timestamp_ms: now_ms,
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                code: 503,
                msg: "unavailable".to_string(),
                data: None,
            }),
        )
    }
}
