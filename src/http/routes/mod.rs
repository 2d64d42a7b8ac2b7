pub mod todos;
pub mod users;

use std::sync::Arc;

use axum::Router;
use axum::response::Html;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::application::account_service::AccountService;
use crate::application::task_service::TaskService;
use crate::infrastructure::avatar::AvatarStore;

use super::render;
use super::session::CurrentUser;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountService>,
    pub tasks: Arc<dyn TaskService>,
    pub avatars: Arc<AvatarStore>,
}

pub fn app(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
    Router::new()
        .route("/", get(home))
        .route("/health", get(|| async { "ok" }))
        .route("/user/register", get(users::register_form).post(users::register))
        .route("/user/login", get(users::login_form).post(users::login))
        .route("/user/logout", get(users::logout))
        .route("/user/account", get(users::account).post(users::update_account))
        .route("/todo/todo_today", get(todos::todo_today).post(todos::add_task))
        .route("/todo/new_todo", get(todos::new_todo).post(todos::new_todo))
        .route("/todo/:id/task_completed", get(todos::task_completed))
        .route("/todo/all_todos", get(todos::all_todos))
        .route("/todo/completed_todos", get(todos::completed_todos))
        .route("/todo/uncompleted_todos", get(todos::uncompleted_todos))
        .nest_service("/static/img", ServeDir::new(state.avatars.dir()))
        .layer(session_layer)
        .with_state(state)
}

async fn home(user: Option<CurrentUser>) -> Html<String> {
    render::home_page(user.as_ref().map(|u| &u.0))
}
