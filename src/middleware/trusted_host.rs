use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::shared::AppError;

/// Host-header allow list. `*` accepts every host and `*.example.com`
/// accepts any subdomain of `example.com`.
#[derive(Debug, Clone)]
pub struct TrustedHosts {
    allow_any: bool,
    patterns: Vec<String>,
}

impl TrustedHosts {
    pub fn new(allowed_hosts: &[String]) -> Self {
        Self {
            allow_any: allowed_hosts.iter().any(|h| h == "*"),
            patterns: allowed_hosts
                .iter()
                .filter(|h| h.as_str() != "*")
                .map(|h| h.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        if self.allow_any {
            return true;
        }

        let host = strip_port(host).to_ascii_lowercase();
        self.patterns.iter().any(|pattern| match pattern.strip_prefix('*') {
            // "*.example.com" keeps the leading dot so "badexample.com" does not match
            Some(suffix) => host.ends_with(suffix),
            None => *pattern == host,
        })
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // [::1]:8000
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.split(':').next().unwrap_or(host)
}

/// Rejects requests whose Host header is not in the allow list.
pub async fn trusted_host(
    State(hosts): State<Arc<TrustedHosts>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let host = req
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| req.uri().host())
        .unwrap_or("");

    if !hosts.is_allowed(host) {
        warn!(host = %host, "Rejected request with untrusted host header");
        return Err(AppError::InvalidHost);
    }

    Ok(next.run(req).await)
}
