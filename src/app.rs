use std::sync::Arc;

use axum::{
    extract::State,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::{
    cors_layer, log_requests, metrics_handler, track_metrics, trusted_host, TrustedHosts,
};
use crate::security;
use crate::shared::AppState;

/// Builds the application router with all middleware attached.
///
/// Layers run outermost first: HTTP trace, trusted host, CORS, request
/// logging, then (production only) per-route metrics.
pub fn create_application(state: AppState) -> Router {
    let settings = Arc::clone(&state.settings);

    let api_v1 = Router::new()
        .route("/auth/me", get(security::read_token_data))
        .route_layer(from_fn_with_state(state.clone(), security::jwt_auth));

    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest(&settings.api_v1_str, api_v1);

    if let Some(metrics) = state.metrics.clone() {
        info!("Exposing Prometheus metrics at /metrics");
        app = app
            .route("/metrics", get(metrics_handler))
            .route_layer(from_fn_with_state(metrics, track_metrics));
    }

    let trusted_hosts = Arc::new(TrustedHosts::new(&settings.allowed_hosts));

    app.layer(from_fn(log_requests))
        .layer(cors_layer(&settings.allowed_hosts))
        .layer(from_fn_with_state(trusted_hosts, trusted_host))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /
async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", state.settings.project_name),
        "version": state.settings.project_version,
    }))
}

/// GET /health
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
