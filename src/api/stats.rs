//! Status API endpoint

use axum::{Json, extract::State as AxumState, response::IntoResponse};
use serde_json::json;
use std::sync::atomic::Ordering;

use crate::SharedState;

/// GET /status - Server status with delivery counters
pub async fn status(AxumState(state): AxumState<SharedState>) -> impl IntoResponse {
    let delivered = state.delivered.load(Ordering::Relaxed);
    let failed = state.failed.load(Ordering::Relaxed);

    Json(json!({
        "server": {
            "name": "gate_notify",
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": state.started_at,
            "uptime_seconds": state.start_time.elapsed().as_secs(),
        },
        "deliveries": {
            "delivered": delivered,
            "failed": failed,
        },
        "config": {
            "total_projects": state.config.project.len(),
            "include_branch": state.config.slack.include_branch(),
        }
    }))
}
