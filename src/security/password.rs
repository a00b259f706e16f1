use tracing::{debug, instrument};

use crate::shared::AppError;

pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// bcrypt password hashing with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes with a fresh random salt, so equal inputs give different hashes.
    #[instrument(skip(self, password))]
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost).map_err(|e| {
            debug!(error = %e, cost = self.cost, "Password hashing failed");
            AppError::PasswordHash(e.to_string())
        })
    }

    /// Returns false on mismatch and on hashes that cannot be parsed.
    #[instrument(skip(self, password, hash))]
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                debug!(error = %e, "Stored password hash could not be checked");
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
