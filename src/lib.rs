// Library crate for the API service
// This file exposes the public API for integration tests

pub mod app;
pub mod config;
pub mod middleware;
pub mod security;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use app::create_application;
pub use config::{ConfigError, Environment, Settings};
pub use security::{Token, TokenData, TokenService};
pub use shared::{AppError, AppState};
