use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::TagWithCount;

pub async fn list_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TagWithCount>>>, ApiError> {
    let tags = state.tags.list_tags().await?;
    Ok(Json(ApiResponse::success(tags)))
}
