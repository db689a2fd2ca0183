//! Todo operations scoped to the authenticated owner
//!
//! Every lookup carries the owner's id down to the store. A todo that
//! exists but belongs to someone else is reported exactly like one that
//! does not exist.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::user::UserId;
use crate::core::todo::{NewTodo, Todo, TodoId, TodoPatch};
use crate::error::{Result, RustyTodosError};
use crate::storage::SharedTodoStorage;

pub struct TodoService {
    storage: SharedTodoStorage,
}

impl TodoService {
    pub fn new(storage: SharedTodoStorage) -> Self {
        Self { storage }
    }

    pub async fn create(&self, owner: &UserId, input: NewTodo) -> Result<Todo> {
        let todo = Todo::new(*owner, &input.text)?;
        self.storage.insert_todo(todo.clone()).await?;
        log::debug!("User {} created todo {}", owner, todo.id);
        Ok(todo)
    }

    pub async fn list(&self, owner: &UserId) -> Result<Vec<Todo>> {
        self.storage.list_todos(owner).await
    }

    pub async fn get(&self, owner: &UserId, id: &str) -> Result<Todo> {
        let id = parse_todo_id(id)?;
        self.storage
            .get_todo(owner, &id)
            .await?
            .ok_or(RustyTodosError::NotFound)
    }

    pub async fn update(&self, owner: &UserId, id: &str, patch: TodoPatch) -> Result<Todo> {
        let id = parse_todo_id(id)?;
        let patch = patch.validate()?;

        let now_millis = Utc::now().timestamp_millis();
        self.storage
            .update_todo(owner, &id, &patch, now_millis)
            .await?
            .ok_or(RustyTodosError::NotFound)
    }

    pub async fn delete(&self, owner: &UserId, id: &str) -> Result<Todo> {
        let id = parse_todo_id(id)?;
        let removed = self
            .storage
            .delete_todo(owner, &id)
            .await?
            .ok_or(RustyTodosError::NotFound)?;

        log::debug!("User {} deleted todo {}", owner, removed.id);
        Ok(removed)
    }
}

/// A path segment that is not a valid id cannot name any todo
pub fn parse_todo_id(raw: &str) -> Result<TodoId> {
    Uuid::parse_str(raw).map_err(|_| RustyTodosError::NotFound)
}
