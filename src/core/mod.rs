//! Todo model and owner-scoped todo operations

pub mod ownership;
pub mod todo;

// Re-export main components for convenience
pub use ownership::{parse_todo_id, TodoService};
pub use todo::{NewTodo, Todo, TodoId, TodoPatch};
