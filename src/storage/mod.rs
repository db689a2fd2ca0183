//! Storage backends for users and todos

pub mod memory;
pub mod traits;

// Re-export main components
pub use memory::{MemoryStorage, MemoryTodoStorage, MemoryUserStorage};
pub use traits::{SharedTodoStorage, SharedUserStorage, TodoStorage, UserStorage};
