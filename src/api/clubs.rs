use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::{ClubDetails, ClubPatch, CreateClubRequest};

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Deserialize)]
pub struct CreateClubBody {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Patch body for club updates. `description` distinguishes
/// absent (leave alone) from present-but-null (clear).
#[derive(Deserialize, Default)]
pub struct UpdateClubBody {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct FavoriteBody {
    pub username: String,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn requester(headers: &HeaderMap) -> Option<&str> {
    headers.get("x-username").and_then(|v| v.to_str().ok())
}

pub async fn list_clubs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ClubDetails>>>, ApiError> {
    let clubs = state.clubs.list_clubs().await?;
    Ok(Json(ApiResponse::success(clubs)))
}

pub async fn search_clubs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ClubDetails>>>, ApiError> {
    let clubs = state.clubs.search_clubs(&query.q).await?;
    Ok(Json(ApiResponse::success(clubs)))
}

pub async fn create_club(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateClubBody>,
) -> Result<(StatusCode, Json<ApiResponse<ClubDetails>>), ApiError> {
    let outcome = state
        .clubs
        .create_club(CreateClubRequest {
            code: body.code,
            name: body.name,
            description: body.description,
            tags: body.tags,
        })
        .await?;

    let status = if outcome.was_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ApiResponse::success(outcome.into_inner()))))
}

pub async fn update_club(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateClubBody>,
) -> Result<Json<ApiResponse<ClubDetails>>, ApiError> {
    let patch = ClubPatch {
        code: body.code,
        name: body.name,
        description: body.description,
        tags: body.tags,
    };

    let club = state
        .clubs
        .update_club(&code, requester(&headers), patch)
        .await?;

    Ok(Json(ApiResponse::success(club)))
}

pub async fn favorite_club(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(body): Json<FavoriteBody>,
) -> Result<Json<ApiResponse<ClubDetails>>, ApiError> {
    let club = state.clubs.favorite_club(&code, &body.username).await?;
    Ok(Json(ApiResponse::success(club)))
}
