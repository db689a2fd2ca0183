//! Request gate for routes that need an authenticated user
//!
//! A request starts `Unauthenticated` and ends either `Authenticated`, with
//! the user and token attached, or `Rejected`. All rejections look the same
//! to the client.

use std::fmt;
use std::sync::Arc;
use warp::http::HeaderMap;
use warp::{Filter, Rejection};

use crate::auth::service::AuthService;
use crate::auth::token::token_fingerprint;
use crate::auth::user::User;
use crate::constants::{AUTH_HEADER, MAX_TOKEN_LENGTH};
use crate::error::RustyTodosError;

/// Identity attached to an authenticated request
#[derive(Clone)]
pub struct AuthContext {
    pub user: User,
    pub token: String,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("user", &self.user)
            .field("token", &token_fingerprint(&self.token))
            .finish()
    }
}

#[derive(Debug)]
pub enum GuardState {
    Unauthenticated,
    Authenticated(AuthContext),
    Rejected,
}

impl GuardState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, GuardState::Authenticated(_))
    }
}

#[derive(Clone)]
pub struct AuthGuard {
    auth: Arc<AuthService>,
}

impl AuthGuard {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }

    /// Drive one request from `Unauthenticated` to a terminal state
    pub async fn resolve(&self, headers: &HeaderMap) -> GuardState {
        let token = match extract_token(headers) {
            Some(token) => token,
            None => {
                log::debug!("Request without a usable {} header", AUTH_HEADER);
                return GuardState::Rejected;
            }
        };

        match self.auth.authenticate(&token).await {
            Ok(user) => GuardState::Authenticated(AuthContext { user, token }),
            Err(_) => {
                log::debug!("Rejected token {}", token_fingerprint(&token));
                GuardState::Rejected
            }
        }
    }
}

/// Pull the token out of the auth header. Oversized or non-printable values
/// are treated as absent.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTH_HEADER)?.to_str().ok()?.trim();

    if value.is_empty() || value.len() > MAX_TOKEN_LENGTH {
        return None;
    }
    if value.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return None;
    }

    Some(value.to_string())
}

/// Warp filter yielding the `AuthContext`, or rejecting with `Unauthorized`
pub fn with_auth(
    guard: AuthGuard,
) -> impl Filter<Extract = (AuthContext,), Error = Rejection> + Clone {
    warp::header::headers_cloned()
        .and(warp::any().map(move || guard.clone()))
        .and_then(|headers: HeaderMap, guard: AuthGuard| async move {
            match guard.resolve(&headers).await {
                GuardState::Authenticated(context) => Ok(context),
                _ => Err(warp::reject::custom(RustyTodosError::Unauthorized)),
            }
        })
}
