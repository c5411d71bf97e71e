use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::entities::{prelude::*, users};

/// Input for a user insert. `created` is assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub admin: bool,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user)
    }

    /// Inserts a user, stamping `created` with the current time.
    ///
    /// Returns `Ok(None)` when the username (or email) is already
    /// taken, so a racing duplicate create reads the same as the
    /// synchronous existence check.
    pub async fn insert(&self, new_user: NewUser) -> Result<Option<users::Model>> {
        let created = chrono::Utc::now().to_rfc3339();

        let insert = Users::insert(users::ActiveModel {
            username: Set(new_user.username.clone()),
            email: Set(new_user.email),
            display_name: Set(new_user.display_name),
            admin: Set(new_user.admin),
            created: Set(created),
            ..Default::default()
        })
        .exec(&self.conn)
        .await;

        match insert {
            Ok(res) => {
                let user = Users::find_by_id(res.last_insert_id)
                    .one(&self.conn)
                    .await
                    .context("Failed to re-read inserted user")?
                    .ok_or_else(|| {
                        anyhow::anyhow!("Inserted user vanished: {}", new_user.username)
                    })?;
                Ok(Some(user))
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(err) => Err(err).context("Failed to insert user"),
        }
    }
}
