use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use std::collections::HashMap;

use crate::entities::{club_tags, prelude::*, tags};

pub struct TagRepository {
    conn: DatabaseConnection,
}

impl TagRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<tags::Model>> {
        let tag = Tags::find()
            .filter(tags::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query tag by name")?;

        Ok(tag)
    }

    /// Every tag with its live club count, ordered by name.
    pub async fn list_with_counts(&self) -> Result<Vec<(tags::Model, i64)>> {
        let all_tags = Tags::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list tags")?;

        let counts: Vec<(i32, i64)> = ClubTags::find()
            .select_only()
            .column(club_tags::Column::TagId)
            .column_as(club_tags::Column::ClubId.count(), "club_count")
            .group_by(club_tags::Column::TagId)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count clubs per tag")?;

        let counts: HashMap<i32, i64> = counts.into_iter().collect();

        Ok(all_tags
            .into_iter()
            .map(|t| {
                let count = counts.get(&t.id).copied().unwrap_or(0);
                (t, count)
            })
            .collect())
    }

    /// Looks up a tag by canonical name, inserting it if absent.
    ///
    /// Generic over the connection so it runs inside the club
    /// create/update transactions. A concurrent insert losing the race
    /// on the unique name column is re-read instead of surfaced.
    pub async fn get_or_create<C: ConnectionTrait>(conn: &C, name: &str) -> Result<tags::Model> {
        if let Some(tag) = Tags::find()
            .filter(tags::Column::Name.eq(name))
            .one(conn)
            .await
            .context("Failed to query tag by name")?
        {
            return Ok(tag);
        }

        let insert = Tags::insert(tags::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        })
        .exec(conn)
        .await;

        match insert {
            Ok(res) => Tags::find_by_id(res.last_insert_id)
                .one(conn)
                .await
                .context("Failed to re-read inserted tag")?
                .ok_or_else(|| anyhow::anyhow!("Inserted tag vanished: {name}")),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Tags::find()
                    .filter(tags::Column::Name.eq(name))
                    .one(conn)
                    .await
                    .context("Failed to re-read tag after conflict")?
                    .ok_or_else(|| anyhow::anyhow!("Tag conflict but no row: {name}"))
            }
            Err(err) => Err(err).context("Failed to insert tag"),
        }
    }
}
