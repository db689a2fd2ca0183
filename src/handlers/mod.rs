//! Request handlers and route wiring for the REST API

pub mod rejection;
pub mod todos;
pub mod users;

use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

use crate::auth::guard::{with_auth, AuthGuard};
use crate::auth::service::AuthService;
use crate::config::ServerConfig;
use crate::core::ownership::TodoService;
use crate::core::todo::{NewTodo, TodoPatch};
use crate::error::Result;
use crate::security::api_security_headers;
use crate::storage::{MemoryStorage, SharedTodoStorage, SharedUserStorage};

pub use rejection::handle_rejection;
use users::Credentials;

/// Shared services handed to every route
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub todos: Arc<TodoService>,
}

impl AppState {
    /// Services backed by fresh in-memory storage
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let storage = MemoryStorage::new();
        Self::with_storage(config, storage.users, storage.todos)
    }

    pub fn with_storage(
        config: &ServerConfig,
        users: SharedUserStorage,
        todos: SharedTodoStorage,
    ) -> Result<Self> {
        Ok(Self {
            auth: Arc::new(AuthService::from_config(config, users)?),
            todos: Arc::new(TodoService::new(todos)),
        })
    }
}

// Helper filters to include state in request
fn with_auth_service(
    auth: Arc<AuthService>,
) -> impl Filter<Extract = (Arc<AuthService>,), Error = Infallible> + Clone {
    warp::any().map(move || auth.clone())
}

fn with_todos(
    todos: Arc<TodoService>,
) -> impl Filter<Extract = (Arc<TodoService>,), Error = Infallible> + Clone {
    warp::any().map(move || todos.clone())
}

fn json_body<T>(max_body_bytes: u64) -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(max_body_bytes).and(warp::body::json())
}

/// All API routes with rejection handling and security headers applied.
///
/// Guarded routes check method before the token and the token before the body.
pub fn api_routes(
    state: &AppState,
    max_body_bytes: u64,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let guard = AuthGuard::new(state.auth.clone());

    let register = warp::path("users")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body::<Credentials>(max_body_bytes))
        .and(with_auth_service(state.auth.clone()))
        .and_then(users::register);

    let login = warp::path!("users" / "login")
        .and(warp::post())
        .and(json_body::<Credentials>(max_body_bytes))
        .and(with_auth_service(state.auth.clone()))
        .and_then(users::login);

    let me = warp::path!("users" / "me")
        .and(warp::get())
        .and(with_auth(guard.clone()))
        .and_then(users::me);

    let logout = warp::path!("users" / "me" / "token")
        .and(warp::delete())
        .and(with_auth(guard.clone()))
        .and(with_auth_service(state.auth.clone()))
        .and_then(users::logout);

    let create_todo = warp::path!("todos")
        .and(warp::post())
        .and(with_auth(guard.clone()))
        .and(json_body::<NewTodo>(max_body_bytes))
        .and(with_todos(state.todos.clone()))
        .and_then(todos::create);

    let list_todos = warp::path!("todos")
        .and(warp::get())
        .and(with_auth(guard.clone()))
        .and(with_todos(state.todos.clone()))
        .and_then(todos::list);

    let get_todo = warp::path!("todos" / String)
        .and(warp::get())
        .and(with_auth(guard.clone()))
        .and(with_todos(state.todos.clone()))
        .and_then(todos::get);

    let update_todo = warp::path!("todos" / String)
        .and(warp::patch())
        .and(with_auth(guard.clone()))
        .and(json_body::<TodoPatch>(max_body_bytes))
        .and(with_todos(state.todos.clone()))
        .and_then(todos::update);

    let delete_todo = warp::path!("todos" / String)
        .and(warp::delete())
        .and(with_auth(guard))
        .and(with_todos(state.todos.clone()))
        .and_then(todos::delete);

    // Create health check route
    let health = warp::path!("health").and(warp::get()).map(|| "OK");

    let user_routes = register.or(login).or(me).or(logout);
    let todo_routes = create_todo
        .or(list_todos)
        .or(get_todo)
        .or(update_todo)
        .or(delete_todo);

    user_routes
        .or(todo_routes)
        .or(health)
        .recover(handle_rejection)
        .with(api_security_headers())
}
