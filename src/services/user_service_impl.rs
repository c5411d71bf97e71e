//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;

use crate::db::{NewUser, Store};
use crate::entities::users;
use crate::normalize::normalize_name;
use crate::services::CreateOutcome;
use crate::services::user_service::{CreateUserRequest, UserError, UserProfile, UserService};

pub struct SeaOrmUserService {
    store: Store,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn profile_of(user: users::Model) -> UserProfile {
    UserProfile {
        username: user.username,
        display_name: user.display_name,
        created: user.created,
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateOutcome<UserProfile>, UserError> {
        let username = normalize_name(&request.username)
            .ok_or_else(|| UserError::Validation("Username is required".to_string()))?;

        if let Some(existing) = self.store.find_user_by_username(&username).await? {
            return Ok(CreateOutcome::AlreadyExists(profile_of(existing)));
        }

        let inserted = self
            .store
            .insert_user(NewUser {
                username: username.clone(),
                display_name: request.display_name,
                email: request.email,
                admin: request.admin,
            })
            .await?;

        match inserted {
            Some(user) => Ok(CreateOutcome::Created(profile_of(user))),
            // Lost a create race on the unique username column.
            None => {
                let existing = self
                    .store
                    .find_user_by_username(&username)
                    .await?
                    .ok_or_else(|| {
                        UserError::Database(format!("User '{username}' conflicted but is missing"))
                    })?;
                Ok(CreateOutcome::AlreadyExists(profile_of(existing)))
            }
        }
    }

    async fn get_profile(&self, username: &str) -> Result<UserProfile, UserError> {
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| UserError::NotFound(username.to_string()))?;

        Ok(profile_of(user))
    }
}
