//! Todo endpoints. Each one runs behind the auth guard and passes the
//! caller's id to the ownership layer.

use serde_json::json;
use std::sync::Arc;
use warp::{Rejection, Reply};

use crate::auth::guard::AuthContext;
use crate::core::ownership::TodoService;
use crate::core::todo::{NewTodo, TodoPatch};

/// `POST /todos`
pub async fn create(
    context: AuthContext,
    input: NewTodo,
    todos: Arc<TodoService>,
) -> Result<impl Reply, Rejection> {
    let todo = todos
        .create(&context.user.id, input)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&todo))
}

/// `GET /todos`
pub async fn list(context: AuthContext, todos: Arc<TodoService>) -> Result<impl Reply, Rejection> {
    let owned = todos
        .list(&context.user.id)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&json!({ "todos": owned })))
}

/// `GET /todos/:id`
pub async fn get(
    id: String,
    context: AuthContext,
    todos: Arc<TodoService>,
) -> Result<impl Reply, Rejection> {
    let todo = todos
        .get(&context.user.id, &id)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&json!({ "todo": todo })))
}

/// `PATCH /todos/:id`
pub async fn update(
    id: String,
    context: AuthContext,
    patch: TodoPatch,
    todos: Arc<TodoService>,
) -> Result<impl Reply, Rejection> {
    let todo = todos
        .update(&context.user.id, &id, patch)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&json!({ "todo": todo })))
}

/// `DELETE /todos/:id`
pub async fn delete(
    id: String,
    context: AuthContext,
    todos: Arc<TodoService>,
) -> Result<impl Reply, Rejection> {
    let todo = todos
        .delete(&context.user.id, &id)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&json!({ "todo": todo })))
}
