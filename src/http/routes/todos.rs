use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::domain::error::Error;
use crate::domain::todo::{TaskFilter, TaskId};
use crate::http::render;
use crate::http::session::CurrentUser;
use crate::http::types::AppError;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub task: String,
}

pub async fn todo_today(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let today = state.tasks.today(user.id).await?;
    Ok(render::today_page(&user, today.as_ref().map(|(_, tasks)| tasks.as_slice()), None))
}

pub async fn add_task(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Form(form): Form<TaskForm>,
) -> Result<Response, AppError> {
    match state.tasks.add_task(user.id, &form.task).await {
        Ok(_) => Ok(Redirect::to("/todo/todo_today").into_response()),
        Err(Error::Validation(msg)) => {
            let today = state.tasks.today(user.id).await?;
            let page = render::today_page(
                &user,
                today.as_ref().map(|(_, tasks)| tasks.as_slice()),
                Some(&msg),
            );
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        // Posting a task without having started today's list.
        Err(Error::NotFound) => Ok(Redirect::to("/todo/todo_today").into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn new_todo(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    state.tasks.start_today(user.id).await?;
    Ok(Redirect::to("/todo/todo_today"))
}

pub async fn task_completed(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.tasks.complete_task(user.id, TaskId(id)).await?;
    Ok(Redirect::to("/todo/todo_today"))
}

pub async fn all_todos(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let tasks = state.tasks.tasks(user.id, TaskFilter::All).await?;
    Ok(render::task_list_page(&user, "All tasks", &tasks))
}

pub async fn completed_todos(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let tasks = state.tasks.tasks(user.id, TaskFilter::Completed).await?;
    Ok(render::task_list_page(&user, "Completed tasks", &tasks))
}

pub async fn uncompleted_todos(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let tasks = state.tasks.tasks(user.id, TaskFilter::Uncompleted).await?;
    Ok(render::task_list_page(&user, "Uncompleted tasks", &tasks))
}
