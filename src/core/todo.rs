use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::user::UserId;
use crate::error::{Result, RustyTodosError};

pub type TodoId = Uuid;

/// Maximum todo text length, in characters
pub const MAX_TODO_TEXT_LENGTH: usize = 1000;

/// A todo item owned by one user.
///
/// `completed_at` is set exactly when `completed` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    /// Completion time in epoch milliseconds
    pub completed_at: Option<i64>,
    pub owner_id: UserId,
}

impl Todo {
    /// Creates an open todo for `owner_id`
    pub fn new(owner_id: UserId, text: &str) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            text: clean_text(text)?,
            completed: false,
            completed_at: None,
            owner_id,
        })
    }

    /// Apply a validated patch.
    ///
    /// Marking complete stamps `now_millis`; anything other than an explicit
    /// `completed: true` reopens the todo and clears the timestamp.
    pub fn apply(&mut self, patch: &TodoPatch, now_millis: i64) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }

        if patch.completed == Some(true) {
            self.completed = true;
            self.completed_at = Some(now_millis);
        } else {
            self.completed = false;
            self.completed_at = None;
        }
    }
}

/// Body of `POST /todos`
#[derive(Debug, Clone, Deserialize)]
pub struct NewTodo {
    pub text: String,
}

/// Body of `PATCH /todos/:id`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Trim and check the text, if any
    pub fn validate(self) -> Result<Self> {
        let text = match self.text {
            Some(text) => Some(clean_text(&text)?),
            None => None,
        };
        Ok(Self {
            text,
            completed: self.completed,
        })
    }
}

/// Trim todo text and require something to remain
pub fn clean_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RustyTodosError::ValidationError(
            "Todo text must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_TODO_TEXT_LENGTH {
        return Err(RustyTodosError::ValidationError(format!(
            "Todo text must be at most {} characters",
            MAX_TODO_TEXT_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}
