use axum::{Extension, Json};
use tracing::{info, instrument};

use super::types::TokenData;

/// HTTP handler describing the caller's verified token
///
/// GET {API_V1_STR}/auth/me
/// Requires the `jwt_auth` middleware on the route.
#[instrument(name = "read_token_data", skip(token_data))]
pub async fn read_token_data(Extension(token_data): Extension<TokenData>) -> Json<TokenData> {
    info!(sub = %token_data.sub, "Returning verified token data");
    Json(token_data)
}
