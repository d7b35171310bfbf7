use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::types::{Board, Column};

use super::ApiContext;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub background: Option<String>,
    pub owner_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardResponse {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<Column>,
}

#[derive(Deserialize)]
pub struct RenameBoardRequest {
    pub title: String,
}

#[derive(Deserialize)]
pub struct ShareBoardRequest {
    pub email: String,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Board>>> {
    let boards = ctx.db.boards_for_user(&params.user_id)?;
    Ok(Json(boards))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<CreateBoardResponse>)> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::missing_field("title"));
    }
    let background = req.background.unwrap_or_default();
    let (board, columns) = ctx
        .db
        .create_board(req.id, title.to_string(), background, req.owner_id)?;
    tracing::info!(board_id = %board.id, "created board");
    Ok((StatusCode::CREATED, Json(CreateBoardResponse { board, columns })))
}

pub async fn rename(
    State(ctx): State<ApiContext>,
    Path(board_id): Path<String>,
    Json(req): Json<RenameBoardRequest>,
) -> ApiResult<Json<Board>> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::missing_field("title"));
    }
    ctx.db.rename_board(&board_id, title)?;
    let board = ctx
        .db
        .get_board(&board_id)?
        .ok_or_else(|| ApiError::board_not_found(&board_id))?;
    Ok(Json(board))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(board_id): Path<String>,
) -> ApiResult<StatusCode> {
    ctx.db.delete_board(&board_id)?;
    tracing::info!(board_id = %board_id, "deleted board");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn share(
    State(ctx): State<ApiContext>,
    Path(board_id): Path<String>,
    Json(req): Json<ShareBoardRequest>,
) -> ApiResult<StatusCode> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::missing_field("email"));
    }
    ctx.db.share_board(&board_id, &email)?;
    tracing::info!(board_id = %board_id, "shared board");
    Ok(StatusCode::NO_CONTENT)
}
