use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::types::UserProfile;

use super::ApiContext;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(ctx): State<ApiContext>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<UserProfile>> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();
    if name.is_empty() {
        return Err(ApiError::missing_field("name"));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::invalid_value("email", "a valid email is required"));
    }
    if req.password.len() < 6 {
        return Err(ApiError::invalid_value(
            "password",
            "password must be at least 6 characters",
        ));
    }
    let user = ctx.db.register_user(name, &email, &req.password)?;
    tracing::info!(user_id = %user.id, "registered user");
    Ok(Json(UserProfile::from(user)))
}

pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<UserProfile>> {
    let email = req.email.trim().to_lowercase();
    match ctx.db.verify_login(&email, &req.password)? {
        Some(user) => {
            tracing::debug!(user_id = %user.id, "login ok");
            Ok(Json(UserProfile::from(user)))
        }
        None => Err(ApiError::invalid_credentials()),
    }
}
