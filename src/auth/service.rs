//! Account operations exposed to the HTTP layer: register, login,
//! authenticate and logout.

use std::fmt;
use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::auth::token::{token_fingerprint, TokenScope, TokenService};
use crate::auth::user::{normalize_email, User};
use crate::auth::user_store::UserStore;
use crate::config::ServerConfig;
use crate::error::{Result, RustyTodosError};
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::SharedUserStorage;

/// A user together with a freshly issued live token
#[derive(Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("token", &token_fingerprint(&self.token))
            .finish()
    }
}

pub struct AuthService {
    store: Arc<UserStore>,
}

impl AuthService {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    /// Wire the hasher, token service and user store from configuration
    pub fn from_config(config: &ServerConfig, storage: SharedUserStorage) -> Result<Self> {
        let hasher = PasswordHasher::new(&config.hash)?;
        let tokens = TokenService::new(&config.jwt_secret);
        let store = UserStore::new(storage, hasher, tokens, config.min_password_length)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Create an account and log it in. The user and its first token are
    /// stored together or not at all.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthSession> {
        match self.store.create_with_token(email, password, TokenScope::Auth).await {
            Ok((user, token)) => {
                log_security_event(SecurityEvent::TokenIssued {
                    user_id: user.id.to_string(),
                    token_id: token_fingerprint(&token),
                })
                .await;
                Ok(AuthSession { user, token })
            }
            Err(e) => {
                if matches!(e, RustyTodosError::ValidationError(_) | RustyTodosError::DuplicateEmail) {
                    log_security_event(SecurityEvent::RegistrationRejected {
                        email: normalize_email(email),
                        reason: e.kind().to_string(),
                    })
                    .await;
                }
                Err(e)
            }
        }
    }

    /// Check credentials and issue a new token. A failed login stores nothing.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let user = match self.store.find_by_credentials(email, password).await? {
            Some(user) => user,
            None => {
                log_security_event(SecurityEvent::LoginFailed {
                    email: normalize_email(email),
                })
                .await;
                return Err(RustyTodosError::InvalidCredentials);
            }
        };

        let token = self.store.issue_and_record_token(&user, TokenScope::Auth).await?;
        log_security_event(SecurityEvent::TokenIssued {
            user_id: user.id.to_string(),
            token_id: token_fingerprint(&token),
        })
        .await;

        Ok(AuthSession { user, token })
    }

    /// Resolve a presented token to its user.
    ///
    /// Every failure, including an unavailable store, comes back as
    /// `Unauthorized` so callers cannot tell causes apart.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        match self.store.find_by_token(token).await {
            Ok(Some(user)) => {
                log_security_event(SecurityEvent::AuthenticationSuccess {
                    user_id: user.id.to_string(),
                })
                .await;
                Ok(user)
            }
            Ok(None) => {
                log_security_event(SecurityEvent::AuthenticationFailed {
                    token_id: Some(token_fingerprint(token)),
                    reason: "Token not live".to_string(),
                })
                .await;
                Err(RustyTodosError::Unauthorized)
            }
            Err(e) => {
                log::error!("User lookup failed during authentication: {}", e);
                log_security_event(SecurityEvent::AuthenticationFailed {
                    token_id: Some(token_fingerprint(token)),
                    reason: e.kind().to_string(),
                })
                .await;
                Err(RustyTodosError::Unauthorized)
            }
        }
    }

    /// Revoke `token` for `user`. Idempotent.
    pub async fn logout(&self, user: &User, token: &str) -> Result<()> {
        self.store.revoke_token(user, token).await?;
        log_security_event(SecurityEvent::TokenRevoked {
            user_id: user.id.to_string(),
            token_id: token_fingerprint(token),
        })
        .await;
        Ok(())
    }
}
