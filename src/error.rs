use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

#[derive(Debug)]
pub enum RustyTodosError {
    // Input errors
    ValidationError(String),
    DuplicateEmail,
    InvalidCredentials,

    // Auth errors
    InvalidToken(String),
    Unauthorized,

    // Resource errors
    NotFound,

    // Internal errors
    HashingFailure(String),
    StorageError(String),

    // Configuration errors
    ConfigError(String),
}

impl RustyTodosError {
    /// HTTP status this error maps to at the API boundary.
    ///
    /// `InvalidToken` collapses into 401 like every other authentication failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) | Self::DuplicateEmail | Self::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidToken(_) | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::HashingFailure(_) | Self::StorageError(_) | Self::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error code
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken(_) | Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::HashingFailure(_) | Self::StorageError(_) | Self::ConfigError(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Message safe to show to a client. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::ValidationError(msg) => msg.clone(),
            Self::DuplicateEmail => "Email address is already registered".to_string(),
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::InvalidToken(_) | Self::Unauthorized => String::new(),
            Self::NotFound => "Resource not found".to_string(),
            Self::HashingFailure(_) | Self::StorageError(_) | Self::ConfigError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl fmt::Display for RustyTodosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::DuplicateEmail => write!(f, "Email address is already registered"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized access"),
            Self::NotFound => write!(f, "Resource not found"),
            Self::HashingFailure(msg) => write!(f, "Hashing failure: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for RustyTodosError {}

impl warp::reject::Reject for RustyTodosError {}

// Generic result type for RustyTodos
pub type Result<T> = std::result::Result<T, RustyTodosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_share_one_face() {
        let invalid = RustyTodosError::InvalidToken("bad signature".to_string());
        let unauthorized = RustyTodosError::Unauthorized;

        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.kind(), unauthorized.kind());
        assert_eq!(invalid.public_message(), unauthorized.public_message());
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = RustyTodosError::StorageError("connection refused on 10.0.0.3".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("10.0.0.3"));
        assert!(err.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(RustyTodosError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RustyTodosError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RustyTodosError::ValidationError("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RustyTodosError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
