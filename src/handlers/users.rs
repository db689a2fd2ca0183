//! Account endpoints: register, login, profile and logout

use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use warp::{Rejection, Reply};

use crate::auth::guard::AuthContext;
use crate::auth::service::{AuthService, AuthSession};
use crate::constants::AUTH_HEADER;

/// Body of `POST /users` and `POST /users/login`
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn session_reply(session: AuthSession) -> impl Reply {
    warp::reply::with_header(
        warp::reply::json(&session.user.profile()),
        AUTH_HEADER,
        session.token,
    )
}

/// `POST /users`
pub async fn register(
    credentials: Credentials,
    auth: Arc<AuthService>,
) -> Result<impl Reply, Rejection> {
    let session = auth
        .register(&credentials.email, &credentials.password)
        .await
        .map_err(warp::reject::custom)?;

    log::info!("Registered user {}", session.user.id);
    Ok(session_reply(session))
}

/// `POST /users/login`
pub async fn login(
    credentials: Credentials,
    auth: Arc<AuthService>,
) -> Result<impl Reply, Rejection> {
    let session = auth
        .login(&credentials.email, &credentials.password)
        .await
        .map_err(warp::reject::custom)?;

    log::info!("User {} logged in", session.user.id);
    Ok(session_reply(session))
}

/// `GET /users/me`
pub async fn me(context: AuthContext) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&context.user.profile()))
}

/// `DELETE /users/me/token`: revoke the token this request was made with
pub async fn logout(
    context: AuthContext,
    auth: Arc<AuthService>,
) -> Result<impl Reply, Rejection> {
    auth.logout(&context.user, &context.token)
        .await
        .map_err(warp::reject::custom)?;

    log::info!("User {} logged out", context.user.id);
    Ok(warp::reply())
}
