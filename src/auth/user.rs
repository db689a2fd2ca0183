use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::auth::token::TokenScope;
use crate::constants::{MAX_EMAIL_LENGTH, MAX_PASSWORD_LENGTH};
use crate::error::{Result, RustyTodosError};
use crate::security::constant_time_eq;

pub type UserId = Uuid;

/// A token entry in a user's live-token set
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub scope: TokenScope,
    pub token: String,
}

impl IssuedToken {
    pub fn new(scope: TokenScope, token: String) -> Self {
        Self { scope, token }
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("scope", &self.scope)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Stored user record
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier, immutable once assigned
    pub id: UserId,
    /// Normalised (trimmed, lower-case) email address
    pub email: String,
    /// PHC-formatted password hash
    pub password_hash: String,
    /// Live-token set. A token not listed here is revoked.
    pub tokens: Vec<IssuedToken>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user record from already-validated input
    pub fn new(id: UserId, email: String, password_hash: String) -> Self {
        Self {
            id,
            email,
            password_hash,
            tokens: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether `token` is in the live-token set under `scope`
    pub fn has_live_token(&self, scope: TokenScope, token: &str) -> bool {
        // Walk the whole list so the answer does not depend on the entry's position
        self.tokens.iter().fold(false, |found, entry| {
            (entry.scope == scope && constant_time_eq(&entry.token, token)) || found
        })
    }

    /// Public view of the account
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("tokens", &self.tokens.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// What the API exposes about a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
}

/// Registration input that passed validation
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
}

impl NewUser {
    /// Validate email and password before anything gets hashed or stored
    pub fn validate(email: &str, password: &str, min_password_length: usize) -> Result<Self> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password, min_password_length)?;

        Ok(Self {
            email,
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Structural email check: one `@`, non-empty local part, dotted domain
pub fn validate_email(email: &str) -> Result<()> {
    let invalid = || RustyTodosError::ValidationError("Invalid email address".to_string());

    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(invalid());
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    if labels
        .iter()
        .any(|label| label.starts_with('-') || label.ends_with('-'))
    {
        return Err(invalid());
    }

    Ok(())
}

pub fn validate_password(password: &str, min_length: usize) -> Result<()> {
    if password.chars().count() < min_length {
        return Err(RustyTodosError::ValidationError(format!(
            "Password must be at least {} characters long",
            min_length
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(RustyTodosError::ValidationError(format!(
            "Password must be at most {} bytes long",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
