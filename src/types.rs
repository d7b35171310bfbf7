//! Core types for the corkboard server and client core.
//!
//! All API-facing types serialize camelCase, matching the REST contract.

use serde::{Deserialize, Serialize};

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Parse a priority string. Unrecognized values fall back to medium.
pub fn parse_priority(s: &str) -> Priority {
    match s.to_lowercase().as_str() {
        "low" => Priority::Low,
        "high" => Priority::High,
        _ => Priority::Medium,
    }
}

/// Explicit column category, set at creation time.
///
/// Stored on the row rather than inferred from the title;
/// [`ColumnKind::suggest`] offers a keyword-based default at creation
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Todo,
    InProgress,
    Done,
    #[default]
    Other,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Todo => "todo",
            ColumnKind::InProgress => "in_progress",
            ColumnKind::Done => "done",
            ColumnKind::Other => "other",
        }
    }

    /// Suggest a kind from a column title. Used only as a creation-time
    /// default; never re-derived from renames.
    pub fn suggest(title: &str) -> ColumnKind {
        let t = title.to_lowercase();
        if t.contains("todo") || t.contains("to do") {
            ColumnKind::Todo
        } else if t.contains("progress") || t.contains("doing") {
            ColumnKind::InProgress
        } else if t.contains("done") || t.contains("complete") {
            ColumnKind::Done
        } else {
            ColumnKind::Other
        }
    }
}

/// Parse a stored column kind string.
pub fn parse_column_kind(s: &str) -> ColumnKind {
    match s {
        "todo" => ColumnKind::Todo,
        "in_progress" => ColumnKind::InProgress,
        "done" => ColumnKind::Done,
        _ => ColumnKind::Other,
    }
}

/// A top-level project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub title: String,
    pub background: String,
    pub owner_id: Option<String>,
}

/// An ordered lane within a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub board_id: String,
    pub title: String,
    /// Left-to-right rank. Assigned at creation, never reindexed.
    pub rank: i64,
    #[serde(default)]
    pub kind: ColumnKind,
}

/// A checklist entry embedded in a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// A comment embedded in a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author: String,
    pub created_at: i64,
}

/// An attachment record embedded in a task. Only metadata lives here;
/// file transport is out of scope for this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub uploaded_at: i64,
}

/// A unit of work within a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub column_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    /// Persisted fractional rank within the column. Rows are returned
    /// sorted by this, so a reload reproduces the arranged order.
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    pub created_at: i64,
}

/// A registered account. The password hash never leaves the db layer;
/// API responses use [`UserProfile`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub initials: String,
    pub avatar_url: Option<String>,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub initials: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            initials: u.initials,
            avatar_url: u.avatar_url,
        }
    }
}
