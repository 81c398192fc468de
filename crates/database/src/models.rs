//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered sender, keyed by their phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Phone number as a number (e.g., 5215512345678)
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Phone number as received from the channel
    pub phone: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Who wrote a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("unknown message role: {}", other)),
        }
    }
}

/// A persisted conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub user_id: i64,
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
    pub created_at: String,
}

/// A message waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub role: MessageRole,
    pub content: String,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A persisted set of one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WorkoutSet {
    pub id: i64,
    pub user_id: i64,
    pub exercise: String,
    pub weight: f64,
    pub reps: i64,
    pub created_at: String,
}

/// A set waiting to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutSet {
    pub exercise: String,
    pub reps: u8,
    pub weight: f32,
}

impl NewWorkoutSet {
    pub fn new(exercise: impl Into<String>, reps: u8, weight: f32) -> Self {
        Self {
            exercise: exercise.into(),
            reps,
            weight,
        }
    }
}
