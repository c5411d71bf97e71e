use axum::{
    Json, Router,
    http::HeaderValue,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ClubService, SeaOrmClubService, SeaOrmTagService, SeaOrmUserService, TagService, UserService,
};

mod clubs;
mod error;
mod tags;
mod types;
mod users;

pub use error::ApiError;
pub use types::ApiResponse;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub clubs: Arc<dyn ClubService>,

    pub users: Arc<dyn UserService>,

    pub tags: Arc<dyn TagService>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            clubs: Arc::new(SeaOrmClubService::new(store.clone())),
            users: Arc::new(SeaOrmUserService::new(store.clone())),
            tags: Arc::new(SeaOrmTagService::new(store.clone())),
            store,
        }
    }
}

pub async fn create_app_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::new(&config.general.database_path).await?;
    Ok(Arc::new(AppState::new(store)))
}

pub fn router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api_router = Router::new()
        .route("/", get(api_welcome))
        .route("/clubs", get(clubs::list_clubs))
        .route("/clubs", post(clubs::create_club))
        .route("/clubs/search", get(clubs::search_clubs))
        .route("/clubs/{code}", patch(clubs::update_club))
        .route("/clubs/{code}/favorite", post(clubs::favorite_club))
        .route("/tags", get(tags::list_tags))
        .route("/users", post(users::create_user))
        .route("/users/{username}", get(users::get_user_profile))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/", get(welcome))
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

async fn welcome() -> &'static str {
    "Welcome to Club Review!"
}

async fn api_welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to the Club Review API!" }))
}
