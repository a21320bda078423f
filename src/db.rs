//! Persistence for the `users` and `todos` collections.
//!
//! `Database` wraps a `sqlx` SQLite pool. It is cheap to clone and is shared by all
//! workers through `AppState`. Every method is a single statement, so each write is
//! atomic on its own and no transactions are needed.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Todo, TodoUpdate, User};

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id BLOB PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

const CREATE_TODOS: &str = "CREATE TABLE IF NOT EXISTS todos (
    id BLOB PRIMARY KEY NOT NULL,
    text TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const TODO_COLUMNS: &str = "id, text, completed, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and creates the schema if it does not exist yet.
    ///
    /// Each connection to `sqlite::memory:` is its own database, so in-memory stores
    /// are pinned to a single connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections.max(1));
        if url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(options).await?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        sqlx::query(CREATE_TODOS).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Inserts a user. A username that is already taken yields `AppError::Conflict`.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All todos, newest first.
    pub async fn list_todos(&self) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos ORDER BY created_at DESC, rowid DESC",
            TODO_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(todos)
    }

    pub async fn find_todo(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = ?",
            TODO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    pub async fn insert_todo(&self, todo: &Todo) -> Result<Todo, AppError> {
        let stored = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (id, text, completed, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(todo.id)
        .bind(&todo.text)
        .bind(todo.completed)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    /// Applies the fields present in `changes`. Returns `None` when no todo has `id`.
    pub async fn update_todo(
        &self,
        id: Uuid,
        changes: &TodoUpdate,
    ) -> Result<Option<Todo>, AppError> {
        let updated = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos
             SET text = COALESCE(?, text), completed = COALESCE(?, completed), updated_at = ?
             WHERE id = ?
             RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(changes.text.as_deref())
        .bind(changes.completed)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    /// Deletes a todo and reports how many rows were removed (0 or 1).
    pub async fn delete_todo(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
