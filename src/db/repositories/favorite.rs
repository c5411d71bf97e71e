use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set};
use std::collections::HashMap;

use crate::entities::{favorites, prelude::*};

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, club_id: i32, user_id: i32) -> Result<favorites::Model> {
        let res = Favorites::insert(favorites::ActiveModel {
            club_id: Set(club_id),
            user_id: Set(user_id),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("Failed to insert favorite")?;

        Favorites::find_by_id(res.last_insert_id)
            .one(&self.conn)
            .await
            .context("Failed to re-read inserted favorite")?
            .ok_or_else(|| anyhow::anyhow!("Inserted favorite vanished"))
    }

    /// Favorite counts for the given clubs, keyed by club id. Clubs
    /// with no favorites are absent from the map.
    pub async fn counts_for_clubs(&self, club_ids: &[i32]) -> Result<HashMap<i32, i64>> {
        if club_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let counts: Vec<(i32, i64)> = Favorites::find()
            .select_only()
            .column(favorites::Column::ClubId)
            .column_as(favorites::Column::Id.count(), "favorite_count")
            .filter(favorites::Column::ClubId.is_in(club_ids.iter().copied()))
            .group_by(favorites::Column::ClubId)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count favorites per club")?;

        Ok(counts.into_iter().collect())
    }
}
