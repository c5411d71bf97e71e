use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{clubs, favorites, tags, users};

pub mod migrator;
pub mod repositories;

pub use repositories::club::{ClubChanges, NewClub};
pub use repositories::user::NewUser;

/// Persistence gateway for the whole app: a pooled SQLite connection
/// with migrations applied, fronted by per-entity repositories.
///
/// Cloning is cheap (the pool is shared); a `Store` is handed to each
/// service explicitly rather than living in a global.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn club_repo(&self) -> repositories::club::ClubRepository {
        repositories::club::ClubRepository::new(self.conn.clone())
    }

    fn tag_repo(&self) -> repositories::tag::TagRepository {
        repositories::tag::TagRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn favorite_repo(&self) -> repositories::favorite::FavoriteRepository {
        repositories::favorite::FavoriteRepository::new(self.conn.clone())
    }

    // Clubs

    pub async fn find_club_by_code(&self, code: &str) -> Result<Option<clubs::Model>> {
        self.club_repo().get_by_code(code).await
    }

    pub async fn list_clubs(&self) -> Result<Vec<clubs::Model>> {
        self.club_repo().list_all().await
    }

    pub async fn search_clubs_by_name(&self, fragment: &str) -> Result<Vec<clubs::Model>> {
        self.club_repo().search_by_name(fragment).await
    }

    /// `None` means the code is already taken.
    pub async fn insert_club(&self, new_club: NewClub) -> Result<Option<clubs::Model>> {
        self.club_repo().insert_with_tags(new_club).await
    }

    pub async fn update_club(&self, club_id: i32, changes: ClubChanges) -> Result<clubs::Model> {
        self.club_repo().update(club_id, changes).await
    }

    pub async fn tags_for_clubs(&self, clubs: &[clubs::Model]) -> Result<Vec<Vec<String>>> {
        self.club_repo().tags_for_clubs(clubs).await
    }

    // Tags

    pub async fn find_tag_by_name(&self, name: &str) -> Result<Option<tags::Model>> {
        self.tag_repo().get_by_name(name).await
    }

    pub async fn list_tags_with_counts(&self) -> Result<Vec<(tags::Model, i64)>> {
        self.tag_repo().list_with_counts().await
    }

    // Users

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_username(username).await
    }

    /// `None` means the username (or email) is already taken.
    pub async fn insert_user(&self, new_user: NewUser) -> Result<Option<users::Model>> {
        self.user_repo().insert(new_user).await
    }

    // Favorites

    pub async fn insert_favorite(&self, club_id: i32, user_id: i32) -> Result<favorites::Model> {
        self.favorite_repo().insert(club_id, user_id).await
    }

    pub async fn favorite_counts(&self, club_ids: &[i32]) -> Result<HashMap<i32, i64>> {
        self.favorite_repo().counts_for_clubs(club_ids).await
    }
}
