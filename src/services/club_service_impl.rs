//! `SeaORM` implementation of the `ClubService` trait.

use async_trait::async_trait;

use crate::db::{ClubChanges, NewClub, Store};
use crate::entities::clubs;
use crate::normalize::{normalize_code, normalize_name, normalize_tags};
use crate::services::CreateOutcome;
use crate::services::club_service::{
    ClubDetails, ClubError, ClubPatch, ClubService, CreateClubRequest,
};

pub struct SeaOrmClubService {
    store: Store,
}

impl SeaOrmClubService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Builds club views: tag names and favorite counts are loaded in
    /// two batched queries regardless of how many clubs are passed.
    async fn assemble(&self, clubs: Vec<clubs::Model>) -> Result<Vec<ClubDetails>, ClubError> {
        let tag_lists = self.store.tags_for_clubs(&clubs).await?;

        let ids: Vec<i32> = clubs.iter().map(|c| c.id).collect();
        let favorite_counts = self.store.favorite_counts(&ids).await?;

        Ok(clubs
            .into_iter()
            .zip(tag_lists)
            .map(|(club, tags)| ClubDetails {
                favorite_count: favorite_counts.get(&club.id).copied().unwrap_or(0),
                id: club.id,
                code: club.code,
                name: club.name,
                description: club.description,
                tags,
            })
            .collect())
    }

    async fn assemble_one(&self, club: clubs::Model) -> Result<ClubDetails, ClubError> {
        let mut details = self.assemble(vec![club]).await?;
        details
            .pop()
            .ok_or_else(|| ClubError::Database("Club view assembly came back empty".to_string()))
    }

    async fn require_admin(&self, requester: Option<&str>) -> Result<(), ClubError> {
        let username = requester.ok_or(ClubError::Unauthorized)?;

        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(ClubError::Unauthorized)?;

        if user.admin {
            Ok(())
        } else {
            Err(ClubError::Forbidden)
        }
    }
}

#[async_trait]
impl ClubService for SeaOrmClubService {
    async fn list_clubs(&self) -> Result<Vec<ClubDetails>, ClubError> {
        let clubs = self.store.list_clubs().await?;
        self.assemble(clubs).await
    }

    async fn search_clubs(&self, fragment: &str) -> Result<Vec<ClubDetails>, ClubError> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(ClubError::Validation(
                "Search query must not be empty".to_string(),
            ));
        }

        let clubs = self.store.search_clubs_by_name(fragment).await?;
        self.assemble(clubs).await
    }

    async fn create_club(
        &self,
        request: CreateClubRequest,
    ) -> Result<CreateOutcome<ClubDetails>, ClubError> {
        let code = normalize_code(&request.code)
            .ok_or_else(|| ClubError::Validation("Club code is required".to_string()))?;
        let name = normalize_name(&request.name)
            .ok_or_else(|| ClubError::Validation("Club name is required".to_string()))?;
        let tags = normalize_tags(&request.tags);

        if let Some(existing) = self.store.find_club_by_code(&code).await? {
            let details = self.assemble_one(existing).await?;
            return Ok(CreateOutcome::AlreadyExists(details));
        }

        let inserted = self
            .store
            .insert_club(NewClub {
                code: code.clone(),
                name,
                description: request.description,
                tags,
            })
            .await?;

        match inserted {
            Some(club) => Ok(CreateOutcome::Created(self.assemble_one(club).await?)),
            // Lost a create race; the unique constraint is the backstop.
            None => {
                let existing = self
                    .store
                    .find_club_by_code(&code)
                    .await?
                    .ok_or_else(|| ClubError::Database(format!("Club '{code}' conflicted but is missing")))?;
                let details = self.assemble_one(existing).await?;
                Ok(CreateOutcome::AlreadyExists(details))
            }
        }
    }

    async fn update_club(
        &self,
        code: &str,
        requester: Option<&str>,
        patch: ClubPatch,
    ) -> Result<ClubDetails, ClubError> {
        self.require_admin(requester).await?;

        let code = normalize_code(code)
            .ok_or_else(|| ClubError::Validation("Club code is required".to_string()))?;
        let club = self
            .store
            .find_club_by_code(&code)
            .await?
            .ok_or_else(|| ClubError::ClubNotFound(code.clone()))?;

        // A blank patched code is ignored; a real one must match.
        if let Some(patched_code) = patch.code.as_deref()
            && let Some(normalized) = normalize_code(patched_code)
            && normalized != club.code
        {
            return Err(ClubError::ImmutableCode);
        }

        let changes = ClubChanges {
            // An empty-after-trim name keeps the old value.
            name: patch.name.as_deref().and_then(normalize_name),
            description: patch.description,
            tags: patch.tags.map(normalize_tags),
        };

        let updated = self.store.update_club(club.id, changes).await?;
        self.assemble_one(updated).await
    }

    async fn favorite_club(&self, code: &str, username: &str) -> Result<ClubDetails, ClubError> {
        let code = normalize_code(code)
            .ok_or_else(|| ClubError::Validation("Club code is required".to_string()))?;

        let club = self
            .store
            .find_club_by_code(&code)
            .await?
            .ok_or_else(|| ClubError::ClubNotFound(code.clone()))?;

        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| ClubError::UserNotFound(username.to_string()))?;

        self.store.insert_favorite(club.id, user.id).await?;

        self.assemble_one(club).await
    }
}
