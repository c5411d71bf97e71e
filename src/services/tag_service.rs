//! Domain service for tags.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for TagError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TagError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Tag view: canonical name plus how many clubs currently link it.
#[derive(Debug, Clone, Serialize)]
pub struct TagWithCount {
    pub name: String,
    pub club_count: i64,
}

#[async_trait::async_trait]
pub trait TagService: Send + Sync {
    /// Every tag with its live club count, ordered by name.
    async fn list_tags(&self) -> Result<Vec<TagWithCount>, TagError>;
}
