//! Abstract storage interfaces for pluggable backends
//!
//! Backends must apply each mutation atomically. Token-list changes in
//! particular are single store operations, never read-modify-write in
//! application code, so concurrent logins and logouts cannot lose updates.

use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::user::{IssuedToken, User, UserId};
use crate::core::todo::{Todo, TodoId, TodoPatch};
use crate::error::Result;

/// User data storage interface
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Insert a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn insert_user(&self, user: User) -> Result<()>;

    /// Get user by ID
    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// Get user by (normalised) email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Atomically append to a user's live-token set. An entry that is already
    /// live is not added twice. `NotFound` if the user is gone.
    async fn push_token(&self, user_id: &UserId, token: IssuedToken) -> Result<()>;

    /// Atomically remove a token from a user's live-token set.
    /// Removing a token that is not there is a no-op.
    async fn pull_token(&self, user_id: &UserId, token: &str) -> Result<()>;
}

/// Todo storage interface. Every query is scoped to an owner.
#[async_trait]
pub trait TodoStorage: Send + Sync {
    /// Store a new todo
    async fn insert_todo(&self, todo: Todo) -> Result<()>;

    /// All todos belonging to `owner`
    async fn list_todos(&self, owner: &UserId) -> Result<Vec<Todo>>;

    /// A todo, only if it belongs to `owner`
    async fn get_todo(&self, owner: &UserId, id: &TodoId) -> Result<Option<Todo>>;

    /// Apply a patch to an owned todo and return the updated record
    async fn update_todo(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: &TodoPatch,
        now_millis: i64,
    ) -> Result<Option<Todo>>;

    /// Remove an owned todo and return it
    async fn delete_todo(&self, owner: &UserId, id: &TodoId) -> Result<Option<Todo>>;
}

pub type SharedUserStorage = Arc<dyn UserStorage>;
pub type SharedTodoStorage = Arc<dyn TodoStorage>;
