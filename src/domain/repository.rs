use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::Result;
use super::todo::{Task, TaskFilter, TaskId, Todo, TodoId};
use super::user::{NewUser, ProfileUpdate, User, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persists a new account; `DuplicateIdentity` when username or email
    /// is already taken.
    async fn create(&self, input: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<()>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Creates the list for the given day, or returns the existing one.
    /// One list per user per day is enforced here.
    async fn create_todo(&self, user: UserId, date: NaiveDate) -> Result<Todo>;
    async fn todo_for_date(&self, user: UserId, date: NaiveDate) -> Result<Option<Todo>>;
    async fn tasks_of(&self, todo: TodoId) -> Result<Vec<Task>>;
    async fn add_task(&self, todo: TodoId, text: &str) -> Result<Task>;
    /// Task together with the id of the user owning its list.
    async fn task_owner(&self, id: TaskId) -> Result<Option<(Task, UserId)>>;
    async fn mark_completed(&self, id: TaskId) -> Result<()>;
    /// All of the user's tasks, newest list first.
    async fn tasks_for_user(&self, user: UserId, filter: TaskFilter) -> Result<Vec<Task>>;
}
