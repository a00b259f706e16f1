use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use crate::shared::{AppError, AppState};

/// Bearer authentication middleware - verifies the Authorization header and adds TokenData to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), security::jwt_auth))
/// Handlers can then extract Extension(token_data): Extension<TokenData>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!(uri = %req.uri(), "Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    // Auth schemes are case-insensitive.
    let token = auth_header
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
        .map(|(_, token)| token)
        .ok_or_else(|| {
            warn!("Invalid Authorization header format (expected Bearer token)");
            AppError::Unauthorized("Invalid authorization header format".to_string())
        })?;

    let token_data = state.token_service.verify_token(token.trim()).ok_or_else(|| {
        warn!("Bearer token failed verification");
        AppError::Unauthorized("Could not validate credentials".to_string())
    })?;

    info!(sub = %token_data.sub, "Authentication successful");

    req.extensions_mut().insert(token_data);

    Ok(next.run(req).await)
}
