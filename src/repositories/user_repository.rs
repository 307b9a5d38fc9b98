use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::User,
    repositories::is_duplicate_key,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("users");
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(result) => {
                let mut created = user;
                created.id = result.inserted_id.as_object_id();
                Ok(created)
            }
            // Backstop behind the service's duplicate check; the unique
            // index wins any insert race.
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Username '{}' is already taken",
                user.username
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(user)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on users.username");

        Ok(())
    }
}
