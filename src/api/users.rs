use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::types::UserProfile;

use super::ApiContext;

#[derive(Deserialize)]
pub struct LookupParams {
    pub email: String,
}

/// Partial profile update. An explicit null `avatarUrl` clears it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub avatar_url: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

pub async fn list(State(ctx): State<ApiContext>) -> ApiResult<Json<Vec<UserProfile>>> {
    let users = ctx.db.list_users()?;
    Ok(Json(users))
}

pub async fn lookup(
    State(ctx): State<ApiContext>,
    Query(params): Query<LookupParams>,
) -> ApiResult<Json<UserProfile>> {
    let email = params.email.trim().to_lowercase();
    match ctx.db.lookup_user(&email)? {
        Some(profile) => Ok(Json(profile)),
        None => Err(ApiError::user_not_found()),
    }
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(ApiError::missing_field("name"));
        }
    }
    if let Some(password) = &req.password {
        if password.len() < 6 {
            return Err(ApiError::invalid_value(
                "password",
                "password must be at least 6 characters",
            ));
        }
    }
    let profile = ctx.db.update_user(
        &user_id,
        req.name.map(|n| n.trim().to_string()),
        req.password,
        req.avatar_url,
    )?;
    Ok(Json(profile))
}
