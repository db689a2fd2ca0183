//! User persistence on top of the storage backend
//!
//! A token grants access only while its signature verifies AND it is listed
//! in the subject's live-token set. Logout removes the entry, which is what
//! revokes a token whose signature stays valid forever.

use uuid::Uuid;

use crate::auth::password::PasswordHasher;
use crate::auth::token::{token_fingerprint, TokenScope, TokenService};
use crate::auth::user::{normalize_email, IssuedToken, NewUser, User};
use crate::error::{Result, RustyTodosError};
use crate::storage::SharedUserStorage;

/// Compared against when an email is unknown, so lookups take the same time
const DUMMY_PASSWORD: &str = "not-a-real-password-for-timing";

pub struct UserStore {
    storage: SharedUserStorage,
    hasher: PasswordHasher,
    tokens: TokenService,
    min_password_length: usize,
    dummy_hash: String,
}

impl UserStore {
    pub fn new(
        storage: SharedUserStorage,
        hasher: PasswordHasher,
        tokens: TokenService,
        min_password_length: usize,
    ) -> Result<Self> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            storage,
            hasher,
            tokens,
            min_password_length,
            dummy_hash,
        })
    }

    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    /// Validate, hash and persist a new user with an empty token list
    pub async fn create(&self, email: &str, password: &str) -> Result<User> {
        let new_user = NewUser::validate(email, password, self.min_password_length)?;
        let password_hash = self.hash_password(new_user.password).await?;

        let user = User::new(Uuid::new_v4(), new_user.email, password_hash);
        self.storage.insert_user(user.clone()).await?;

        log::info!("Created user {}", user.id);
        Ok(user)
    }

    /// Create a user whose first token is persisted in the same insert.
    ///
    /// Either the user exists with a live token afterwards or nothing was stored.
    pub async fn create_with_token(
        &self,
        email: &str,
        password: &str,
        scope: TokenScope,
    ) -> Result<(User, String)> {
        let new_user = NewUser::validate(email, password, self.min_password_length)?;
        let password_hash = self.hash_password(new_user.password).await?;

        let mut user = User::new(Uuid::new_v4(), new_user.email, password_hash);
        let token = self.tokens.issue(&user.id, scope)?;
        user.tokens.push(IssuedToken::new(scope, token.clone()));

        self.storage.insert_user(user.clone()).await?;

        log::info!(
            "Created user {} with token {}",
            user.id,
            token_fingerprint(&token)
        );
        Ok((user, token))
    }

    /// Look a user up by email and password.
    ///
    /// Unknown email and wrong password both yield `None`.
    pub async fn find_by_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        let user = self.storage.get_user_by_email(&email).await?;

        match user {
            Some(user) => {
                let matches = self
                    .verify_password(password.to_string(), user.password_hash.clone())
                    .await?;
                Ok(matches.then_some(user))
            }
            None => {
                // Burn the same hashing work as a real comparison
                let _ = self
                    .verify_password(password.to_string(), self.dummy_hash.clone())
                    .await;
                Ok(None)
            }
        }
    }

    /// Sign a token for `user` and append it to the live-token set
    pub async fn issue_and_record_token(&self, user: &User, scope: TokenScope) -> Result<String> {
        let token = self.tokens.issue(&user.id, scope)?;
        self.storage
            .push_token(&user.id, IssuedToken::new(scope, token.clone()))
            .await?;

        log::debug!(
            "Recorded token {} for user {}",
            token_fingerprint(&token),
            user.id
        );
        Ok(token)
    }

    /// Resolve a token to its user. Fails closed: a bad signature, a missing
    /// user or a token absent from the live set all give `None`.
    ///
    /// Only storage failures are returned as errors.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<User>> {
        let payload = match self.tokens.verify(token) {
            Ok(payload) => payload,
            Err(e) => {
                log::debug!("Token {} failed verification: {}", token_fingerprint(token), e);
                return Ok(None);
            }
        };

        let user = match self.storage.get_user(&payload.subject_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if user.has_live_token(payload.scope, token) {
            Ok(Some(user))
        } else {
            log::debug!(
                "Token {} is not live for user {}",
                token_fingerprint(token),
                user.id
            );
            Ok(None)
        }
    }

    /// Remove `token` from the user's live set. Revoking an absent token is a no-op.
    pub async fn revoke_token(&self, user: &User, token: &str) -> Result<()> {
        self.storage.pull_token(&user.id, token).await?;
        log::debug!("Revoked token {} for user {}", token_fingerprint(token), user.id);
        Ok(())
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| RustyTodosError::HashingFailure(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| RustyTodosError::HashingFailure(format!("Verify task failed: {}", e)))?
    }
}
