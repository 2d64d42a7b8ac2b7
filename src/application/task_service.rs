use async_trait::async_trait;
use chrono::{Local, NaiveDate};

use crate::domain::error::{Error, Result};
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{MAX_TASK_LEN, Task, TaskFilter, TaskId, Todo};
use crate::domain::user::UserId;

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    /// Read-only lookup of today's list; `None` means no list yet.
    async fn today(&self, user: UserId) -> Result<Option<(Todo, Vec<Task>)>>;
    /// Explicit creation of today's list. Returns the existing list when
    /// the user already started one today.
    async fn start_today(&self, user: UserId) -> Result<Todo>;
    /// Appends to today's list; `NotFound` when the list does not exist.
    async fn add_task(&self, user: UserId, text: &str) -> Result<Task>;
    /// Sets `completed = true`. Idempotent. `Forbidden` when the task
    /// belongs to another user's list.
    async fn complete_task(&self, user: UserId, task: TaskId) -> Result<()>;
    async fn tasks(&self, user: UserId, filter: TaskFilter) -> Result<Vec<Task>>;
}

#[derive(Clone)]
pub struct TaskServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TaskServiceImpl<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

fn today_date() -> NaiveDate {
    Local::now().date_naive()
}

#[async_trait]
impl<R: TodoRepository> TaskService for TaskServiceImpl<R> {
    async fn today(&self, user: UserId) -> Result<Option<(Todo, Vec<Task>)>> {
        let Some(todo) = self.repo.todo_for_date(user, today_date()).await? else {
            return Ok(None);
        };
        let tasks = self.repo.tasks_of(todo.id).await?;
        Ok(Some((todo, tasks)))
    }

    async fn start_today(&self, user: UserId) -> Result<Todo> {
        self.repo.create_todo(user, today_date()).await
    }

    async fn add_task(&self, user: UserId, text: &str) -> Result<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("task text must not be empty".into()));
        }
        if text.len() > MAX_TASK_LEN {
            return Err(Error::Validation(format!(
                "task text must be at most {MAX_TASK_LEN} characters"
            )));
        }
        let Some(todo) = self.repo.todo_for_date(user, today_date()).await? else {
            return Err(Error::NotFound);
        };
        self.repo.add_task(todo.id, text).await
    }

    async fn complete_task(&self, user: UserId, task: TaskId) -> Result<()> {
        let Some((task, owner)) = self.repo.task_owner(task).await? else {
            return Err(Error::NotFound);
        };
        if owner != user {
            return Err(Error::Forbidden);
        }
        if task.completed {
            return Ok(());
        }
        self.repo.mark_completed(task.id).await
    }

    async fn tasks(&self, user: UserId, filter: TaskFilter) -> Result<Vec<Task>> {
        self.repo.tasks_for_user(user, filter).await
    }
}
