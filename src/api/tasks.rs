use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::db::tasks::{NewTask, TaskPatch};
use crate::error::{ApiError, ApiResult};
use crate::types::{Attachment, Comment, Priority, Subtask, Task};

use super::ApiContext;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub id: Option<String>,
    pub column_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub position: Option<f64>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
    pub start_date: Option<i64>,
    pub due_date: Option<i64>,
    pub created_at: Option<i64>,
}

/// Partial update. Absent fields are left alone; `startDate` and
/// `dueDate` distinguish absent from explicit null via double options.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub subtasks: Option<Vec<Subtask>>,
    pub comments: Option<Vec<Comment>>,
    pub assignee_ids: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub start_date: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<i64>>,
}

/// Wraps a field's value in `Some` so an explicit JSON null (clear the
/// date) is distinguishable from an absent field (leave it alone).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTaskRequest {
    pub target_column_id: String,
    pub position: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttachmentRequest {
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Path(board_id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = ctx.db.tasks_for_board(&board_id)?;
    Ok(Json(tasks))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::missing_field("title"));
    }
    let task = ctx.db.create_task(NewTask {
        id: req.id,
        column_id: req.column_id,
        title: title.to_string(),
        description: req.description,
        priority: req.priority,
        position: req.position,
        subtasks: req.subtasks,
        comments: req.comments,
        assignee_ids: req.assignee_ids,
        start_date: req.start_date,
        due_date: req.due_date,
        created_at: req.created_at,
    })?;
    tracing::info!(task_id = %task.id, column_id = %task.column_id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(task_id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(ApiError::missing_field("title"));
        }
    }
    let task = ctx.db.update_task(
        &task_id,
        TaskPatch {
            title: req.title.map(|t| t.trim().to_string()),
            description: req.description,
            priority: req.priority,
            subtasks: req.subtasks,
            comments: req.comments,
            assignee_ids: req.assignee_ids,
            start_date: req.start_date,
            due_date: req.due_date,
        },
    )?;
    Ok(Json(task))
}

pub async fn reorder(
    State(ctx): State<ApiContext>,
    Path(task_id): Path<String>,
    Json(req): Json<ReorderTaskRequest>,
) -> ApiResult<StatusCode> {
    if !req.position.is_finite() {
        return Err(ApiError::invalid_value("position", "position must be finite"));
    }
    ctx.db
        .reorder_task(&task_id, &req.target_column_id, req.position)?;
    tracing::debug!(task_id = %task_id, column_id = %req.target_column_id, "reordered task");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    ctx.db.delete_task(&task_id)?;
    tracing::info!(task_id = %task_id, "deleted task");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_attachment(
    State(ctx): State<ApiContext>,
    Path(task_id): Path<String>,
    Json(req): Json<AddAttachmentRequest>,
) -> ApiResult<(StatusCode, Json<Attachment>)> {
    if req.file_name.trim().is_empty() {
        return Err(ApiError::missing_field("fileName"));
    }
    let attachment = ctx
        .db
        .append_attachment(&task_id, req.file_name, req.file_type, req.file_url)?;
    Ok((StatusCode::CREATED, Json(attachment)))
}
