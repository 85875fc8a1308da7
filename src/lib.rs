pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod location;
pub mod models;
pub mod res;
pub mod screens;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use auth::{PasscodeAuth, TokenClient};
pub use config::Config;
pub use error::{AppError, AuthError, Result};
pub use state::AppState;
