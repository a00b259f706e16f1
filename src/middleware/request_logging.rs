use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Logs each request and its response with timing, and reports the elapsed
/// seconds in the `X-Process-Time` response header.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    info!(%method, %path, %client, "Request: {} {} - Client: {}", method, path, client);

    let mut response = next.run(req).await;

    let process_time = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    info!(
        status,
        duration_secs = process_time,
        "Response: {} - Duration: {:.4}s",
        status,
        process_time
    );

    match HeaderValue::from_str(&process_time.to_string()) {
        Ok(value) => {
            response.headers_mut().insert(PROCESS_TIME_HEADER, value);
        }
        Err(e) => warn!(error = %e, "Could not encode process time header"),
    }

    response
}
