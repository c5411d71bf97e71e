//! Domain service for the club catalog.
//!
//! Covers creation, search, admin-gated updates, and favoriting. All
//! input normalization happens here, so the store only ever sees
//! canonical codes, names, and tags.

use serde::Serialize;
use thiserror::Error;

use super::CreateOutcome;

/// Errors specific to club operations.
#[derive(Debug, Error)]
pub enum ClubError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Club '{0}' not found")]
    ClubNotFound(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Club code cannot be changed")]
    ImmutableCode,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin privileges required")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ClubError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ClubError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Club view DTO: the club row plus its tag names and live favorite
/// count.
#[derive(Debug, Clone, Serialize)]
pub struct ClubDetails {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub favorite_count: i64,
}

/// Raw creation input. Code, name, and tags are normalized by the
/// service before anything is stored.
#[derive(Debug, Clone)]
pub struct CreateClubRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Field-level patch for an update. `None` leaves a field alone.
///
/// Quirks carried over from the reference behavior:
/// - a supplied `code` only fails the update when its normalized form
///   differs from the stored code (same-code no-ops are fine, and a
///   blank code is ignored);
/// - a supplied `name` that is empty after trimming keeps the old
///   value instead of blanking it;
/// - `description: Some(None)` explicitly clears the description;
/// - a supplied tag list replaces the club's tag set wholesale.
#[derive(Debug, Clone, Default)]
pub struct ClubPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

/// Domain service trait for club operations.
#[async_trait::async_trait]
pub trait ClubService: Send + Sync {
    /// Full catalog, ordered by id.
    async fn list_clubs(&self) -> Result<Vec<ClubDetails>, ClubError>;

    /// Case-insensitive substring search on club names. The fragment
    /// must be non-empty after trimming.
    async fn search_clubs(&self, fragment: &str) -> Result<Vec<ClubDetails>, ClubError>;

    /// Creates a club with get-or-create tag resolution. A duplicate
    /// code (checked, or hit in a race) yields `AlreadyExists` with
    /// the existing club.
    async fn create_club(
        &self,
        request: CreateClubRequest,
    ) -> Result<CreateOutcome<ClubDetails>, ClubError>;

    /// Applies a patch to an existing club. The requester must be a
    /// known admin user; the club code is immutable.
    async fn update_club(
        &self,
        code: &str,
        requester: Option<&str>,
        patch: ClubPatch,
    ) -> Result<ClubDetails, ClubError>;

    /// Records a favorite of `code` by `username`. Both must exist;
    /// repeat favorites insert additional rows.
    async fn favorite_club(&self, code: &str, username: &str) -> Result<ClubDetails, ClubError>;
}
