//! In-memory storage implementation for development and testing
//!
//! Keeps every document in memory behind `tokio::sync::RwLock`s. Each
//! mutation runs under a single write guard, which is what makes token
//! pushes and pulls atomic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{TodoStorage, UserStorage};
use crate::auth::user::{IssuedToken, User, UserId};
use crate::core::todo::{Todo, TodoId, TodoPatch};
use crate::error::{Result, RustyTodosError};

#[derive(Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    // email -> user_id, the unique index
    by_email: HashMap<String, UserId>,
}

/// In-memory user storage
#[derive(Default)]
pub struct MemoryUserStorage {
    table: RwLock<UserTable>,
}

impl MemoryUserStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.table.read().await.users.len()
    }
}

#[async_trait]
impl UserStorage for MemoryUserStorage {
    async fn insert_user(&self, user: User) -> Result<()> {
        let mut table = self.table.write().await;

        let email_key = user.email.to_lowercase();
        if table.by_email.contains_key(&email_key) {
            return Err(RustyTodosError::DuplicateEmail);
        }
        if table.users.contains_key(&user.id) {
            return Err(RustyTodosError::StorageError(format!(
                "User id {} already exists",
                user.id
            )));
        }

        table.by_email.insert(email_key, user.id);
        table.users.insert(user.id, user);
        Ok(())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        Ok(self.table.read().await.users.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .get(&email.to_lowercase())
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn push_token(&self, user_id: &UserId, token: IssuedToken) -> Result<()> {
        let mut table = self.table.write().await;
        let user = table.users.get_mut(user_id).ok_or(RustyTodosError::NotFound)?;
        if !user.tokens.contains(&token) {
            user.tokens.push(token);
        }
        Ok(())
    }

    async fn pull_token(&self, user_id: &UserId, token: &str) -> Result<()> {
        let mut table = self.table.write().await;
        if let Some(user) = table.users.get_mut(user_id) {
            user.tokens.retain(|entry| entry.token != token);
        }
        Ok(())
    }
}

#[derive(Default)]
struct TodoTable {
    todos: HashMap<TodoId, Todo>,
    // insertion order, listings follow it
    order: Vec<TodoId>,
}

/// In-memory todo storage
#[derive(Default)]
pub struct MemoryTodoStorage {
    table: RwLock<TodoTable>,
}

impl MemoryTodoStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStorage for MemoryTodoStorage {
    async fn insert_todo(&self, todo: Todo) -> Result<()> {
        let mut table = self.table.write().await;
        if table.todos.contains_key(&todo.id) {
            return Err(RustyTodosError::StorageError(format!(
                "Todo id {} already exists",
                todo.id
            )));
        }
        table.order.push(todo.id);
        table.todos.insert(todo.id, todo);
        Ok(())
    }

    async fn list_todos(&self, owner: &UserId) -> Result<Vec<Todo>> {
        let table = self.table.read().await;
        Ok(table
            .order
            .iter()
            .filter_map(|id| table.todos.get(id))
            .filter(|todo| &todo.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn get_todo(&self, owner: &UserId, id: &TodoId) -> Result<Option<Todo>> {
        let table = self.table.read().await;
        Ok(table.todos.get(id).filter(|todo| &todo.owner_id == owner).cloned())
    }

    async fn update_todo(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: &TodoPatch,
        now_millis: i64,
    ) -> Result<Option<Todo>> {
        let mut table = self.table.write().await;
        match table.todos.get_mut(id) {
            Some(todo) if &todo.owner_id == owner => {
                todo.apply(patch, now_millis);
                Ok(Some(todo.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_todo(&self, owner: &UserId, id: &TodoId) -> Result<Option<Todo>> {
        let mut table = self.table.write().await;
        let owned = table.todos.get(id).map_or(false, |todo| &todo.owner_id == owner);
        if !owned {
            return Ok(None);
        }
        table.order.retain(|entry| entry != id);
        Ok(table.todos.remove(id))
    }
}

/// Both in-memory stores, created together
pub struct MemoryStorage {
    pub users: Arc<MemoryUserStorage>,
    pub todos: Arc<MemoryTodoStorage>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            users: Arc::new(MemoryUserStorage::new()),
            todos: Arc::new(MemoryTodoStorage::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenScope;
    use uuid::Uuid;

    fn user(email: &str) -> User {
        User::new(Uuid::new_v4(), email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_unique_email_index() {
        let storage = MemoryUserStorage::new();
        storage.insert_user(user("alice@example.com")).await.unwrap();

        let result = storage.insert_user(user("alice@example.com")).await;
        assert!(matches!(result, Err(RustyTodosError::DuplicateEmail)));
        assert_eq!(storage.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_push_and_pull_token() {
        let storage = MemoryUserStorage::new();
        let alice = user("alice@example.com");
        let id = alice.id;
        storage.insert_user(alice).await.unwrap();

        storage
            .push_token(&id, IssuedToken::new(TokenScope::Auth, "t1".to_string()))
            .await
            .unwrap();
        storage
            .push_token(&id, IssuedToken::new(TokenScope::Auth, "t2".to_string()))
            .await
            .unwrap();

        // already live, so the set is unchanged
        storage
            .push_token(&id, IssuedToken::new(TokenScope::Auth, "t1".to_string()))
            .await
            .unwrap();
        assert_eq!(storage.get_user(&id).await.unwrap().unwrap().tokens.len(), 2);

        storage.pull_token(&id, "t1").await.unwrap();
        // second pull of the same token is a no-op
        storage.pull_token(&id, "t1").await.unwrap();

        let stored = storage.get_user(&id).await.unwrap().unwrap();
        assert_eq!(stored.tokens.len(), 1);
        assert_eq!(stored.tokens[0].token, "t2");
    }

    #[tokio::test]
    async fn test_push_token_for_missing_user() {
        let storage = MemoryUserStorage::new();
        let result = storage
            .push_token(&Uuid::new_v4(), IssuedToken::new(TokenScope::Auth, "t".to_string()))
            .await;
        assert!(matches!(result, Err(RustyTodosError::NotFound)));
    }

    #[tokio::test]
    async fn test_todos_scoped_to_owner() {
        let storage = MemoryTodoStorage::new();
        let alice = Uuid::new_v4();
        let jen = Uuid::new_v4();

        let todo = Todo::new(alice, "First test todo").unwrap();
        let id = todo.id;
        storage.insert_todo(todo).await.unwrap();
        storage
            .insert_todo(Todo::new(jen, "Second test todo").unwrap())
            .await
            .unwrap();

        assert_eq!(storage.list_todos(&alice).await.unwrap().len(), 1);
        assert!(storage.get_todo(&jen, &id).await.unwrap().is_none());
        assert!(storage
            .update_todo(&jen, &id, &TodoPatch::default(), 1)
            .await
            .unwrap()
            .is_none());
        assert!(storage.delete_todo(&jen, &id).await.unwrap().is_none());

        assert!(storage.delete_todo(&alice, &id).await.unwrap().is_some());
        assert!(storage.get_todo(&alice, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_follows_insertion_order() {
        let storage = MemoryTodoStorage::new();
        let alice = Uuid::new_v4();

        let mut ids = Vec::new();
        for text in ["walk dog", "buy milk", "answer mail"] {
            let todo = Todo::new(alice, text).unwrap();
            ids.push(todo.id);
            storage.insert_todo(todo).await.unwrap();
        }
        storage.delete_todo(&alice, &ids[1]).await.unwrap();

        let texts: Vec<String> = storage
            .list_todos(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.text)
            .collect();
        assert_eq!(texts, vec!["walk dog", "answer mail"]);
    }
}
