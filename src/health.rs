//! Liveness and readiness probes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub uptime_secs: u64,
    pub store_ops: u64,
}

/// Liveness: the process is up and serving.
pub async fn liveness_handler(State(state): State<Arc<AppState>>) -> Response {
    let report = HealthReport {
        status: HealthStatus::Healthy,
        uptime_secs: state.uptime_secs(),
        store_ops: state.store_op_count(),
    };
    (report.status.status_code(), Json(report)).into_response()
}

/// Readiness: the store lock must currently be acquirable for reads.
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> Response {
    let status = if state.try_db().is_some() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };
    let report = HealthReport {
        status,
        uptime_secs: state.uptime_secs(),
        store_ops: state.store_op_count(),
    };
    (status.status_code(), Json(report)).into_response()
}
