//! Prometheus HTTP instrumentation.
//!
//! Records a request counter and a latency histogram per route template and
//! renders them in the Prometheus text format for `GET /metrics`.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::header::CONTENT_TYPE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracing::error;

use crate::shared::{AppError, AppState};

/// HTTP request metrics
pub struct HttpMetrics {
    registry: Registry,
    /// Requests by method, route template and status code
    pub requests_total: IntCounterVec,
    /// Request latency by method and route template
    pub request_duration: HistogramVec,
}

impl HttpMetrics {
    /// Creates the metrics on a dedicated registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "handler", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method", "handler"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
        })
    }

    pub fn record(&self, method: &str, handler: &str, status: u16, seconds: f64) {
        self.requests_total
            .with_label_values(&[method, handler, &status.to_string()])
            .inc();
        self.request_duration
            .with_label_values(&[method, handler])
            .observe(seconds);
    }

    /// Renders all registered metrics in the Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Records every routed request. Install with `route_layer` so the matched
/// route template is available as the handler label.
pub async fn track_metrics(
    State(metrics): State<Arc<HttpMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let handler = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "none".to_string());

    let response = next.run(req).await;

    metrics.record(
        &method,
        &handler,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

/// HTTP handler exposing the collected metrics
///
/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let metrics = state.metrics.as_ref().ok_or(AppError::Internal)?;

    let body = metrics.render().map_err(|e| {
        error!(error = %e, "Failed to render metrics");
        AppError::Internal
    })?;

    Ok(([(CONTENT_TYPE, TextEncoder::new().format_type().to_string())], body).into_response())
}
