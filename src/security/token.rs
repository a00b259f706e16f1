use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::types::{TokenData, TokenError};
use crate::shared::AppError;

/// Claim set carried by an access token.
pub type Claims = Map<String, Value>;

/// Signing parameters for access tokens, fixed at startup
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, algorithm: Algorithm, default_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            algorithm,
            default_ttl,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Signs `claims` with `exp` set to now + `ttl` (or the default TTL).
    /// Any `exp` already present in `claims` is replaced.
    #[instrument(skip(self, claims))]
    pub fn create_token(&self, claims: Claims, ttl: Option<Duration>) -> Result<String, AppError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let expire = Utc::now().checked_add_signed(ttl).ok_or_else(|| {
            debug!(ttl_seconds = ttl.num_seconds(), "Token expiry is out of range");
            AppError::JwtError(format!("expiry {}s from now is out of range", ttl.num_seconds()))
        })?;

        debug!(
            algorithm = ?self.algorithm,
            exp_timestamp = expire.timestamp(),
            "Creating access token"
        );

        let mut to_encode = claims;
        to_encode.insert("exp".to_string(), Value::from(expire.timestamp()));

        encode(
            &Header::new(self.algorithm),
            &to_encode,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode access token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Verifies signature, algorithm and expiry, then projects the claims to `TokenData`.
    #[instrument(skip(self, token))]
    pub fn decode_token(&self, token: &str) -> Result<TokenData, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Time claims are exact; no clock-skew allowance.
        validation.leeway = 0;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(classify)?;

        let sub = claims
            .get("sub")
            .and_then(Value::as_str)
            .ok_or(TokenError::MissingSubject)?
            .to_string();

        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| TokenError::Malformed("exp is not a valid timestamp".to_string()))?;

        debug!(sub = %sub, exp = %exp, "Access token decoded successfully");

        Ok(TokenData { sub, exp })
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
        _ => TokenError::Malformed(err.to_string()),
    }
}
