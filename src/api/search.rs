use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::db::search::SearchHit;
use crate::error::ApiResult;

use super::ApiContext;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn search(
    State(ctx): State<ApiContext>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<SearchHit>>> {
    let hits = ctx.db.search_tasks(params.q.trim())?;
    Ok(Json(hits))
}
