use async_trait::async_trait;
use chrono::Utc;
#[cfg(test)]
use mockall::automock;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::UserQueue,
    repositories::is_duplicate_key,
};

/// Storage for per-user review queues. Writes go through [`save_if_revision`]
/// so two concurrent answer submissions for the same user cannot both land:
/// the replace is conditional on the revision the caller loaded.
///
/// [`save_if_revision`]: QueueRepository::save_if_revision
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueueRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<UserQueue>>;
    async fn create(&self, queue: UserQueue) -> AppResult<UserQueue>;
    async fn save_if_revision(&self, queue: UserQueue) -> AppResult<UserQueue>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQueueRepository {
    collection: Collection<UserQueue>,
}

impl MongoQueueRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("user_queues");
        Self { collection }
    }
}

#[async_trait]
impl QueueRepository for MongoQueueRepository {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<UserQueue>> {
        let queue = self
            .collection
            .find_one(doc! { "user_id": user_id })
            .await?;
        Ok(queue)
    }

    async fn create(&self, queue: UserQueue) -> AppResult<UserQueue> {
        match self.collection.insert_one(&queue).await {
            Ok(result) => {
                let mut created = queue;
                created.id = result.inserted_id.as_object_id();
                Ok(created)
            }
            // Unique index on user_id turns a lost seeding race into a
            // retryable error instead of a second queue for the same user.
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Review queue for user '{}' already exists",
                queue.user_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_if_revision(&self, queue: UserQueue) -> AppResult<UserQueue> {
        let expected_revision = queue.revision;

        let mut updated = queue;
        updated.revision += 1;
        updated.modified_at = Utc::now();

        let filter = doc! {
            "user_id": &updated.user_id,
            "revision": expected_revision,
        };
        let options = ReplaceOptions::builder().upsert(false).build();

        let result = self
            .collection
            .replace_one(filter, &updated)
            .with_options(options)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::Conflict(format!(
                "Review queue for user '{}' was modified concurrently",
                updated.user_id
            )));
        }

        Ok(updated)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on user_queues.user_id");

        Ok(())
    }
}
