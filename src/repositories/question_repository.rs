use async_trait::async_trait;
use futures::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Question};

/// Read side of the shared question bank. Bank order is insertion order,
/// which is what per-user queues are seeded from.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Question>>;
    async fn count(&self) -> AppResult<u64>;
    async fn insert_many(&self, questions: Vec<Question>) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn find_all(&self) -> AppResult<Vec<Question>> {
        let cursor = self.collection.find(doc! {}).await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn count(&self) -> AppResult<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }

    async fn insert_many(&self, questions: Vec<Question>) -> AppResult<()> {
        if questions.is_empty() {
            return Ok(());
        }
        self.collection.insert_many(&questions).await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on questions.id");

        Ok(())
    }
}
