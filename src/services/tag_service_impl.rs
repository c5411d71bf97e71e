//! `SeaORM` implementation of the `TagService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::services::tag_service::{TagError, TagService, TagWithCount};

pub struct SeaOrmTagService {
    store: Store,
}

impl SeaOrmTagService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TagService for SeaOrmTagService {
    async fn list_tags(&self) -> Result<Vec<TagWithCount>, TagError> {
        let tags = self.store.list_tags_with_counts().await?;

        Ok(tags
            .into_iter()
            .map(|(tag, club_count)| TagWithCount {
                name: tag.name,
                club_count,
            })
            .collect())
    }
}
