//! Error handling for the service.
//!
//! Every handler returns `Result<_, AppError>`. The variants map onto the
//! failure kinds the system knows: field validation (400 with a
//! field-tagged body), missing or bad credentials (401), insufficient
//! privilege (403), and unknown identifiers (404). Anything else is a 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::validate::FieldError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] FieldError),
    #[error("authentication credentials were not provided or are invalid")]
    Unauthorized,
    #[error("you do not have permission to perform this action")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error category used as the metrics label.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized => "unauthorized",
            AppError::Forbidden => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "server_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ERROR_METRICS.record(&self);
        crate::metrics::METRICS.record_error(self.category());
        let status = self.status();
        let body = match &self {
            // DRF-style wire format: {"<field>": ["<message>"]}
            AppError::Validation(err) => json!({ err.field: [err.message] }),
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                json!({ "detail": "internal server error" })
            }
            other => json!({ "detail": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Global error counters, grouped the same way as `AppError::category`.
pub static ERROR_METRICS: ErrorMetrics = ErrorMetrics::new();

#[derive(Debug)]
pub struct ErrorMetrics {
    validation: AtomicU64,
    unauthorized: AtomicU64,
    forbidden: AtomicU64,
    not_found: AtomicU64,
    internal: AtomicU64,
}

impl ErrorMetrics {
    const fn new() -> Self {
        Self {
            validation: AtomicU64::new(0),
            unauthorized: AtomicU64::new(0),
            forbidden: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            internal: AtomicU64::new(0),
        }
    }

    fn record(&self, error: &AppError) {
        let counter = match error {
            AppError::Validation(_) => &self.validation,
            AppError::Unauthorized => &self.unauthorized,
            AppError::Forbidden => &self.forbidden,
            AppError::NotFound(_) => &self.not_found,
            AppError::Internal(_) => &self.internal,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ErrorSnapshot {
        ErrorSnapshot {
            validation: self.validation.load(Ordering::Relaxed),
            unauthorized: self.unauthorized.load(Ordering::Relaxed),
            forbidden: self.forbidden.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            internal: self.internal.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ErrorSnapshot {
    pub validation: u64,
    pub unauthorized: u64,
    pub forbidden: u64,
    pub not_found: u64,
    pub internal: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let err = AppError::Validation(FieldError::new("gym_name", "too long"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("gym").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn categories_are_stable() {
        assert_eq!(
            AppError::Validation(FieldError::new("price", "bad")).category(),
            "validation_error"
        );
        assert_eq!(AppError::NotFound("coach").category(), "not_found");
    }
}
