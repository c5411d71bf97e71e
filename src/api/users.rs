use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::{CreateUserRequest, UserProfile};

#[derive(Deserialize)]
pub struct CreateUserBody {
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), ApiError> {
    let outcome = state
        .users
        .create_user(CreateUserRequest {
            username: body.username,
            display_name: body.display_name,
            email: body.email,
            admin: body.admin,
        })
        .await?;

    let status = if outcome.was_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ApiResponse::success(outcome.into_inner()))))
}

pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.users.get_profile(&username).await?;
    Ok(Json(ApiResponse::success(profile)))
}
