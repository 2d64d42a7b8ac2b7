use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::domain::error::{Error, Result};
use crate::domain::repository::{TodoRepository, UserRepository};
use crate::domain::todo::{Task, TaskFilter, TaskId, Todo, TodoId};
use crate::domain::user::{DEFAULT_AVATAR, NewUser, ProfileUpdate, User, UserId};

/// Single SQLite pool backing both the account and the todo store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // A pooled in-memory database would give every connection its own
        // empty schema; keep it on a single connection.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                fullname TEXT,
                avatar TEXT NOT NULL DEFAULT 'default.png'
            )",
        )
        .execute(&*self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                user_id INTEGER NOT NULL REFERENCES users(id)
            )",
        )
        .execute(&*self.pool)
        .await?;
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS todos_user_day
             ON todos (user_id, created_at)",
        )
        .execute(&*self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT 0,
                todo_id INTEGER NOT NULL REFERENCES todos(id)
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn create(&self, input: NewUser) -> Result<User> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password, avatar) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password)
        .bind(DEFAULT_AVATAR)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateIdentity
            } else {
                Error::Database(e)
            }
        })?;
        Ok(User {
            id: UserId(result.last_insert_rowid()),
            username: input.username,
            email: input.email,
            password: input.password,
            fullname: None,
            avatar: DEFAULT_AVATAR.to_string(),
        })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password, fullname, avatar FROM users WHERE id = ?1",
        )
        .bind(id.0)
        .fetch_optional(&*self.pool)
        .await?;
        Ok(row.map(row_to_user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password, fullname, avatar FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&*self.pool)
        .await?;
        Ok(row.map(row_to_user))
    }

    async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<()> {
        sqlx::query("UPDATE users SET fullname = ?2, avatar = COALESCE(?3, avatar) WHERE id = ?1")
            .bind(id.0)
            .bind(&update.fullname)
            .bind(&update.avatar)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for SqliteStore {
    async fn create_todo(&self, user: UserId, date: NaiveDate) -> Result<Todo> {
        let result = sqlx::query(
            "INSERT INTO todos (created_at, user_id) VALUES (?1, ?2)
             ON CONFLICT (user_id, created_at) DO NOTHING",
        )
        .bind(date)
        .bind(user.0)
        .execute(&*self.pool)
        .await?;
        if result.rows_affected() == 0 {
            // Already started today; hand back the existing list.
            return self.todo_for_date(user, date).await?.ok_or(Error::NotFound);
        }
        Ok(Todo { id: TodoId(result.last_insert_rowid()), created_at: date, user_id: user })
    }

    async fn todo_for_date(&self, user: UserId, date: NaiveDate) -> Result<Option<Todo>> {
        let row = sqlx::query(
            "SELECT id, created_at, user_id FROM todos WHERE user_id = ?1 AND created_at = ?2",
        )
        .bind(user.0)
        .bind(date)
        .fetch_optional(&*self.pool)
        .await?;
        Ok(row.map(row_to_todo))
    }

    async fn tasks_of(&self, todo: TodoId) -> Result<Vec<Task>> {
        let rows = sqlx::query(
            "SELECT id, task, completed, todo_id FROM tasks WHERE todo_id = ?1 ORDER BY id",
        )
        .bind(todo.0)
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_task).collect())
    }

    async fn add_task(&self, todo: TodoId, text: &str) -> Result<Task> {
        let result = sqlx::query("INSERT INTO tasks (task, completed, todo_id) VALUES (?1, 0, ?2)")
            .bind(text)
            .bind(todo.0)
            .execute(&*self.pool)
            .await?;
        Ok(Task {
            id: TaskId(result.last_insert_rowid()),
            task: text.to_string(),
            completed: false,
            todo_id: todo,
        })
    }

    async fn task_owner(&self, id: TaskId) -> Result<Option<(Task, UserId)>> {
        let row = sqlx::query(
            "SELECT tasks.id, tasks.task, tasks.completed, tasks.todo_id, todos.user_id
             FROM tasks JOIN todos ON tasks.todo_id = todos.id
             WHERE tasks.id = ?1",
        )
        .bind(id.0)
        .fetch_optional(&*self.pool)
        .await?;
        Ok(row.map(|row| {
            let owner = UserId(row.get("user_id"));
            (row_to_task(row), owner)
        }))
    }

    async fn mark_completed(&self, id: TaskId) -> Result<()> {
        sqlx::query("UPDATE tasks SET completed = 1 WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn tasks_for_user(&self, user: UserId, filter: TaskFilter) -> Result<Vec<Task>> {
        let mut sql = String::from(
            "SELECT tasks.id, tasks.task, tasks.completed, tasks.todo_id
             FROM tasks JOIN todos ON tasks.todo_id = todos.id
             WHERE todos.user_id = ?1",
        );
        if !matches!(filter, TaskFilter::All) {
            sql.push_str(" AND tasks.completed = ?2");
        }
        sql.push_str(" ORDER BY todos.created_at DESC, tasks.id ASC");

        let query = sqlx::query(&sql).bind(user.0);
        let query = match filter {
            TaskFilter::All => query,
            TaskFilter::Completed => query.bind(true),
            TaskFilter::Uncompleted => query.bind(false),
        };
        let rows = query.fetch_all(&*self.pool).await?;
        Ok(rows.into_iter().map(row_to_task).collect())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db)
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation))
}

fn row_to_user(row: SqliteRow) -> User {
    User {
        id: UserId(row.get("id")),
        username: row.get("username"),
        email: row.get("email"),
        password: row.get("password"),
        fullname: row.get("fullname"),
        avatar: row.get("avatar"),
    }
}

fn row_to_todo(row: SqliteRow) -> Todo {
    Todo {
        id: TodoId(row.get("id")),
        created_at: row.get("created_at"),
        user_id: UserId(row.get("user_id")),
    }
}

fn row_to_task(row: SqliteRow) -> Task {
    Task {
        id: TaskId(row.get("id")),
        task: row.get("task"),
        completed: row.get("completed"),
        todo_id: TodoId(row.get("todo_id")),
    }
}
