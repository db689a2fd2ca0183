//! Rusty Todos - a token-authenticated todo REST API
//!
//! Users register with an email and password, receive a signed bearer token
//! in the `x-auth` header and manage todos only they can see. Logging out
//! removes the token from the user's live-token set, which revokes it even
//! though its signature stays valid.

pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;
pub mod security;
pub mod security_logger;
pub mod storage;

// Re-export main components
pub use config::{HashConfig, ServerConfig};
pub use error::{Result, RustyTodosError};
