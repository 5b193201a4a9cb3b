//! Prometheus metrics for production observability.
//!
//! One global registry with HTTP request and error counter families, exposed
//! on `/metrics`.

use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use prometheus_client::encoding::{EncodeLabelSet, text::encode};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use std::sync::Arc;

/// Global metrics registry instance.
pub static METRICS: Lazy<Arc<MetricsCollector>> = Lazy::new(|| Arc::new(MetricsCollector::new()));

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    pub method: String,
    /// Matched route template, e.g. "/rest/gym/{id}/".
    pub path: String,
    pub status: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ErrorLabels {
    pub category: String,
}

pub struct MetricsCollector {
    registry: RwLock<Registry>,
    pub http_requests_total: Family<RequestLabels, Counter>,
    pub errors_total: Family<ErrorLabels, Counter>,
}

impl MetricsCollector {
    fn new() -> Self {
        let mut registry = Registry::default();
        let http_requests_total = Family::<RequestLabels, Counter>::default();
        registry.register(
            "gymdesk_http_requests",
            "HTTP requests by method, route and status",
            http_requests_total.clone(),
        );
        let errors_total = Family::<ErrorLabels, Counter>::default();
        registry.register(
            "gymdesk_errors",
            "Request failures by category",
            errors_total.clone(),
        );
        Self {
            registry: RwLock::new(registry),
            http_requests_total,
            errors_total,
        }
    }

    pub fn record_request(&self, method: &str, path: &str, status: u16) {
        self.http_requests_total
            .get_or_create(&RequestLabels {
                method: method.to_string(),
                path: path.to_string(),
                status: status.to_string(),
            })
            .inc();
    }

    pub fn record_error(&self, category: &str) {
        self.errors_total
            .get_or_create(&ErrorLabels {
                category: category.to_string(),
            })
            .inc();
    }

    pub fn encode(&self) -> String {
        let registry = self.registry.read();
        let mut output = String::new();
        if encode(&mut output, &registry).is_err() {
            tracing::warn!("failed to encode metrics");
        }
        output
    }
}

/// Axum middleware recording every request against the matched route.
pub async fn track_http(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let response = next.run(request).await;
    METRICS.record_request(&method, &path, response.status().as_u16());
    response
}

pub async fn metrics_handler() -> (StatusCode, String) {
    (StatusCode::OK, METRICS.encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_includes_recorded_series() {
        METRICS.record_request("GET", "/rest/gym/", 200);
        METRICS.record_error("validation_error");
        let text = METRICS.encode();
        assert!(text.contains("gymdesk_http_requests"));
        assert!(text.contains("gymdesk_errors"));
    }
}
