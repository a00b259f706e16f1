use chrono::Duration;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{
    password::PasswordHasher,
    token::{Claims, TokenConfig},
    types::{Token, TokenData},
};
use crate::{config::Settings, shared::AppError};

/// Issues and verifies access tokens and hashes passwords.
///
/// Holds only immutable configuration, so one instance can be shared across
/// request handlers without locking.
#[derive(Clone)]
pub struct TokenService {
    token_config: TokenConfig,
    hasher: PasswordHasher,
}

impl TokenService {
    pub fn new(token_config: TokenConfig, hasher: PasswordHasher) -> Self {
        Self {
            token_config,
            hasher,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.token_config(), settings.password_hasher())
    }

    pub fn token_config(&self) -> &TokenConfig {
        &self.token_config
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        self.hasher.hash(password)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        self.hasher.verify(password, hash)
    }

    pub fn create_access_token(
        &self,
        claims: Claims,
        ttl: Option<Duration>,
    ) -> Result<String, AppError> {
        self.token_config.create_token(claims, ttl)
    }

    /// Issues a bearer token whose only custom claim is `sub`.
    #[instrument(skip(self))]
    pub fn issue_for_subject(&self, subject: &str) -> Result<Token, AppError> {
        let mut claims = Claims::new();
        claims.insert("sub".to_string(), Value::from(subject));

        self.create_access_token(claims, None).map(Token::bearer)
    }

    /// Returns the verified subject and expiry, or `None` if the token is
    /// malformed, tampered with, expired or has no subject. The reason is
    /// logged but deliberately not returned.
    #[instrument(skip(self, token))]
    pub fn verify_token(&self, token: &str) -> Option<TokenData> {
        match self.token_config.decode_token(token) {
            Ok(data) => Some(data),
            Err(reason) => {
                debug!(%reason, "Access token rejected");
                None
            }
        }
    }
}
