// Public API - what other modules can use
pub use handlers::read_token_data;
pub use middleware::jwt_auth;
pub use password::{PasswordHasher, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
pub use service::TokenService;
pub use token::{Claims, TokenConfig};
pub use types::{Token, TokenData, TokenError};

mod handlers;
mod middleware;
mod password;
mod service;
mod token;
mod types;
