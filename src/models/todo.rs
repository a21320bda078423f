use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A todo item as stored in the `todos` table and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Unique identifier (UUID v4).
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a todo. Older clients send `title` instead of `text`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewTodo {
    #[serde(alias = "title")]
    #[validate(length(min = 1, max = 500))]
    pub text: String,
}

/// Partial update for a todo. Fields left out of the payload keep their value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TodoUpdate {
    #[serde(default, alias = "title")]
    #[validate(length(min = 1, max = 500))]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl Todo {
    /// Creates a new, not yet completed todo stamped with the current time.
    pub fn new(input: NewTodo) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text: input.text,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}
