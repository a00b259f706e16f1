use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Settings;
use crate::middleware::HttpMetrics;
use crate::security::TokenService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub token_service: Arc<TokenService>,
    /// Present only in production, where `/metrics` is exposed.
    pub metrics: Option<Arc<HttpMetrics>>,
}

impl AppState {
    pub fn new(
        settings: Arc<Settings>,
        token_service: Arc<TokenService>,
        metrics: Option<Arc<HttpMetrics>>,
    ) -> Self {
        Self {
            settings,
            token_service,
            metrics,
        }
    }

    /// Wires every dependency from the loaded settings.
    pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let token_service = Arc::new(TokenService::from_settings(&settings));
        let metrics = if settings.is_production() {
            let metrics = HttpMetrics::new().map_err(|e| {
                tracing::error!(error = %e, "Failed to register HTTP metrics");
                AppError::Internal
            })?;
            Some(Arc::new(metrics))
        } else {
            None
        };

        Ok(Self::new(Arc::new(settings), token_service, metrics))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid host header")]
    InvalidHost,

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::JwtError(msg) => {
                tracing::error!(error = %msg, "Token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not issue token".to_string(),
                )
            }
            AppError::PasswordHash(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::InvalidHost => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
