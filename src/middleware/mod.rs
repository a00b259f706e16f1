//! HTTP middleware wired around every route by `app::create_application`.

pub use cors::cors_layer;
pub use metrics::{metrics_handler, track_metrics, HttpMetrics};
pub use request_logging::{log_requests, PROCESS_TIME_HEADER};
pub use trusted_host::{trusted_host, TrustedHosts};

mod cors;
mod metrics;
mod request_logging;
mod trusted_host;
