use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::types::{Column, ColumnKind};

use super::ApiContext;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    pub id: Option<String>,
    pub board_id: String,
    pub title: String,
    pub kind: Option<ColumnKind>,
}

#[derive(Deserialize)]
pub struct RenameColumnRequest {
    pub title: String,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Path(board_id): Path<String>,
) -> ApiResult<Json<Vec<Column>>> {
    let columns = ctx.db.list_columns(&board_id)?;
    Ok(Json(columns))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::missing_field("title"));
    }
    let column = ctx
        .db
        .create_column(req.id, &req.board_id, title, req.kind)?;
    tracing::info!(column_id = %column.id, board_id = %column.board_id, "created column");
    Ok((StatusCode::CREATED, Json(column)))
}

pub async fn rename(
    State(ctx): State<ApiContext>,
    Path(column_id): Path<String>,
    Json(req): Json<RenameColumnRequest>,
) -> ApiResult<StatusCode> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::missing_field("title"));
    }
    ctx.db.rename_column(&column_id, title)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(column_id): Path<String>,
) -> ApiResult<StatusCode> {
    ctx.db.delete_column(&column_id)?;
    tracing::info!(column_id = %column_id, "deleted column");
    Ok(StatusCode::NO_CONTENT)
}
