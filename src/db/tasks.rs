//! Task CRUD, attachment records, and the reorder write path.

use super::{Database, now_ms};
use crate::error::ApiError;
use crate::types::{Attachment, Comment, Priority, Subtask, Task, parse_priority};
use anyhow::Result;
use rusqlite::{Row, params};
use uuid::Uuid;

pub(crate) fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: String = row.get("priority")?;
    let subtasks_json: String = row.get("subtasks")?;
    let comments_json: String = row.get("comments")?;
    let assignees_json: String = row.get("assignee_ids")?;
    let attachments_json: String = row.get("attachments")?;

    Ok(Task {
        id: row.get("id")?,
        column_id: row.get("column_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: parse_priority(&priority),
        position: row.get("position")?,
        subtasks: serde_json::from_str(&subtasks_json).unwrap_or_default(),
        comments: serde_json::from_str(&comments_json).unwrap_or_default(),
        assignee_ids: serde_json::from_str(&assignees_json).unwrap_or_default(),
        attachments: serde_json::from_str(&attachments_json).unwrap_or_default(),
        start_date: row.get("start_date")?,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
    })
}

/// Fields accepted when creating a task. The client supplies the id so
/// its optimistic copy and the stored row agree.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub id: Option<String>,
    pub column_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Appended after the column's last task when absent.
    pub position: Option<f64>,
    pub subtasks: Vec<Subtask>,
    pub comments: Vec<Comment>,
    pub assignee_ids: Vec<String>,
    pub start_date: Option<i64>,
    pub due_date: Option<i64>,
    pub created_at: Option<i64>,
}

/// Mutable fields of an existing task. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub subtasks: Option<Vec<Subtask>>,
    pub comments: Option<Vec<Comment>>,
    pub assignee_ids: Option<Vec<String>>,
    pub start_date: Option<Option<i64>>,
    pub due_date: Option<Option<i64>>,
}

fn get_task_internal(conn: &rusqlite::Connection, task_id: &str) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;
    match stmt.query_row(params![task_id], parse_task_row) {
        Ok(task) => Ok(Some(task)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Get a task by ID.
    pub fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// List every task on a board, position ascending within the stored
    /// order so the arranged layout survives a reload.
    pub fn tasks_for_board(&self, board_id: &str) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT t.* FROM tasks t
                 JOIN columns c ON t.column_id = c.id
                 WHERE c.board_id = ?1
                 ORDER BY t.position ASC, t.created_at ASC",
            )?;
            let tasks = stmt
                .query_map(params![board_id], parse_task_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(tasks)
        })
    }

    /// Create a task.
    pub fn create_task(&self, input: NewTask) -> Result<Task> {
        let now = now_ms();

        self.with_conn(|conn| {
            let column_exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM columns WHERE id = ?1)",
                params![input.column_id],
                |row| row.get(0),
            )?;
            if !column_exists {
                return Err(ApiError::column_not_found(&input.column_id).into());
            }

            let position = match input.position {
                Some(p) => p,
                None => {
                    let max: Option<f64> = conn.query_row(
                        "SELECT MAX(position) FROM tasks WHERE column_id = ?1",
                        params![input.column_id],
                        |row| row.get(0),
                    )?;
                    max.map_or(1.0, |m| m + 1.0)
                }
            };

            let task_id = input
                .id
                .unwrap_or_else(|| format!("task-{}", Uuid::now_v7()));
            let created_at = input.created_at.unwrap_or(now);

            conn.execute(
                "INSERT INTO tasks (
                    id, column_id, title, description, priority, position,
                    subtasks, comments, assignee_ids, attachments,
                    start_date, due_date, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    task_id,
                    input.column_id,
                    input.title,
                    input.description,
                    input.priority.as_str(),
                    position,
                    serde_json::to_string(&input.subtasks)?,
                    serde_json::to_string(&input.comments)?,
                    serde_json::to_string(&input.assignee_ids)?,
                    "[]",
                    input.start_date,
                    input.due_date,
                    created_at,
                ],
            )?;

            Ok(Task {
                id: task_id,
                column_id: input.column_id,
                title: input.title,
                description: input.description,
                priority: input.priority,
                position,
                subtasks: input.subtasks,
                comments: input.comments,
                assignee_ids: input.assignee_ids,
                attachments: Vec::new(),
                start_date: input.start_date,
                due_date: input.due_date,
                created_at,
            })
        })
    }

    /// Update a task's editable fields. Position and column membership
    /// change only through [`Database::reorder_task`].
    pub fn update_task(&self, task_id: &str, patch: TaskPatch) -> Result<Task> {
        self.with_conn(|conn| {
            let task = get_task_internal(conn, task_id)?
                .ok_or_else(|| ApiError::task_not_found(task_id))?;

            let title = patch.title.unwrap_or(task.title);
            let description = patch.description.unwrap_or(task.description);
            let priority = patch.priority.unwrap_or(task.priority);
            let subtasks = patch.subtasks.unwrap_or(task.subtasks);
            let comments = patch.comments.unwrap_or(task.comments);
            let assignee_ids = patch.assignee_ids.unwrap_or(task.assignee_ids);
            let start_date = patch.start_date.unwrap_or(task.start_date);
            let due_date = patch.due_date.unwrap_or(task.due_date);

            conn.execute(
                "UPDATE tasks SET
                    title = ?1, description = ?2, priority = ?3,
                    subtasks = ?4, comments = ?5, assignee_ids = ?6,
                    start_date = ?7, due_date = ?8
                 WHERE id = ?9",
                params![
                    title,
                    description,
                    priority.as_str(),
                    serde_json::to_string(&subtasks)?,
                    serde_json::to_string(&comments)?,
                    serde_json::to_string(&assignee_ids)?,
                    start_date,
                    due_date,
                    task_id,
                ],
            )?;

            Ok(Task {
                title,
                description,
                priority,
                subtasks,
                comments,
                assignee_ids,
                start_date,
                due_date,
                ..task
            })
        })
    }

    /// Move a task to a column at a fractional position. This is the only
    /// write path that touches `column_id` or `position`.
    pub fn reorder_task(&self, task_id: &str, target_column_id: &str, position: f64) -> Result<()> {
        self.with_conn(|conn| {
            let column_exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM columns WHERE id = ?1)",
                params![target_column_id],
                |row| row.get(0),
            )?;
            if !column_exists {
                return Err(ApiError::column_not_found(target_column_id).into());
            }

            let updated = conn.execute(
                "UPDATE tasks SET column_id = ?1, position = ?2 WHERE id = ?3",
                params![target_column_id, position, task_id],
            )?;
            if updated == 0 {
                return Err(ApiError::task_not_found(task_id).into());
            }
            Ok(())
        })
    }

    /// Delete a task.
    pub fn delete_task(&self, task_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            if deleted == 0 {
                return Err(ApiError::task_not_found(task_id).into());
            }
            Ok(())
        })
    }

    /// Append an attachment record to a task row.
    pub fn append_attachment(
        &self,
        task_id: &str,
        file_name: String,
        file_type: String,
        file_url: String,
    ) -> Result<Attachment> {
        let now = now_ms();

        self.with_conn(|conn| {
            let task = get_task_internal(conn, task_id)?
                .ok_or_else(|| ApiError::task_not_found(task_id))?;

            let attachment = Attachment {
                id: format!("att-{}", Uuid::now_v7()),
                file_name,
                file_type,
                file_url,
                uploaded_at: now,
            };

            let mut attachments = task.attachments;
            attachments.push(attachment.clone());

            conn.execute(
                "UPDATE tasks SET attachments = ?1 WHERE id = ?2",
                params![serde_json::to_string(&attachments)?, task_id],
            )?;

            Ok(attachment)
        })
    }
}
