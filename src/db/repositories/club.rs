use anyhow::{Context, Result};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};

use super::tag::TagRepository;
use crate::entities::{club_tags, clubs, prelude::*, tags};

/// Input for a club insert. Fields are expected to be canonical
/// already (lowercased code, trimmed name, title-cased tags).
#[derive(Debug, Clone)]
pub struct NewClub {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Field changes for a club update. `None` leaves a field untouched;
/// `description: Some(None)` clears it; `tags: Some(..)` replaces the
/// whole link set.
#[derive(Debug, Clone, Default)]
pub struct ClubChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

pub struct ClubRepository {
    conn: DatabaseConnection,
}

impl ClubRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Option<clubs::Model>> {
        let club = Clubs::find()
            .filter(clubs::Column::Code.eq(code))
            .one(&self.conn)
            .await
            .context("Failed to query club by code")?;

        Ok(club)
    }

    pub async fn list_all(&self) -> Result<Vec<clubs::Model>> {
        let clubs = Clubs::find()
            .order_by_asc(clubs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list clubs")?;

        Ok(clubs)
    }

    /// Case-insensitive substring search on the club name. SQLite's
    /// LIKE is case-insensitive for ASCII, which covers the catalog.
    /// LIKE metacharacters in the fragment are escaped so `%` and `_`
    /// match literally.
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<clubs::Model>> {
        let escaped = fragment
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");

        let clubs = Clubs::find()
            .filter(clubs::Column::Name.like(LikeExpr::new(format!("%{escaped}%")).escape('\\')))
            .order_by_asc(clubs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to search clubs by name")?;

        Ok(clubs)
    }

    /// Inserts a club together with its tag links in one transaction.
    /// Tags are resolved get-or-create by canonical name.
    ///
    /// Returns `Ok(None)` when the code is already taken (unique
    /// violation), leaving no partial state behind.
    pub async fn insert_with_tags(&self, new_club: NewClub) -> Result<Option<clubs::Model>> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open transaction")?;

        let insert = Clubs::insert(clubs::ActiveModel {
            code: Set(new_club.code.clone()),
            name: Set(new_club.name),
            description: Set(new_club.description),
            ..Default::default()
        })
        .exec(&txn)
        .await;

        let club_id = match insert {
            Ok(res) => res.last_insert_id,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                // Dropping the txn rolls back; nothing was linked yet.
                return Ok(None);
            }
            Err(err) => return Err(err).context("Failed to insert club"),
        };

        Self::link_tags(&txn, club_id, &new_club.tags).await?;

        let club = Clubs::find_by_id(club_id)
            .one(&txn)
            .await
            .context("Failed to re-read inserted club")?
            .ok_or_else(|| anyhow::anyhow!("Inserted club vanished: {}", new_club.code))?;

        txn.commit().await.context("Failed to commit club insert")?;
        Ok(Some(club))
    }

    /// Applies field changes and, when a tag list is supplied, replaces
    /// the club's tag links wholesale. One transaction, all or nothing.
    pub async fn update(&self, club_id: i32, changes: ClubChanges) -> Result<clubs::Model> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open transaction")?;

        let club = Clubs::find_by_id(club_id)
            .one(&txn)
            .await
            .context("Failed to query club for update")?
            .ok_or_else(|| anyhow::anyhow!("Club {club_id} not found"))?;

        // Skip the UPDATE entirely for a tags-only patch; an active
        // model with nothing set would be rejected as a no-op.
        let mut active: clubs::ActiveModel = club.clone().into();
        let mut dirty = false;
        if let Some(name) = changes.name {
            active.name = Set(name);
            dirty = true;
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
            dirty = true;
        }
        let club = if dirty {
            active
                .update(&txn)
                .await
                .context("Failed to update club fields")?
        } else {
            club
        };

        if let Some(tag_names) = changes.tags {
            club_tags::Entity::delete_many()
                .filter(club_tags::Column::ClubId.eq(club_id))
                .exec(&txn)
                .await
                .context("Failed to clear club tag links")?;

            Self::link_tags(&txn, club_id, &tag_names).await?;
        }

        txn.commit().await.context("Failed to commit club update")?;
        Ok(club)
    }

    /// Tag name lists for the given clubs, index-aligned with the
    /// input slice.
    pub async fn tags_for_clubs(&self, clubs: &[clubs::Model]) -> Result<Vec<Vec<String>>> {
        if clubs.is_empty() {
            return Ok(Vec::new());
        }

        let loaded: Vec<Vec<tags::Model>> = clubs
            .load_many_to_many(Tags, ClubTags, &self.conn)
            .await
            .context("Failed to load tags for clubs")?;

        Ok(loaded
            .into_iter()
            .map(|tags| tags.into_iter().map(|t| t.name).collect())
            .collect())
    }

    async fn link_tags<C: sea_orm::ConnectionTrait>(
        conn: &C,
        club_id: i32,
        tag_names: &[String],
    ) -> Result<()> {
        if tag_names.is_empty() {
            return Ok(());
        }

        let mut links = Vec::with_capacity(tag_names.len());
        for name in tag_names {
            let tag = TagRepository::get_or_create(conn, name).await?;
            links.push(club_tags::ActiveModel {
                club_id: Set(club_id),
                tag_id: Set(tag.id),
            });
        }

        ClubTags::insert_many(links)
            .exec(conn)
            .await
            .context("Failed to link club tags")?;

        Ok(())
    }
}
