// In-memory repositories shared by the integration tests. They honor the
// contracts the Mongo-backed implementations provide: unique usernames, one
// queue per user, revision-checked queue saves and hash-addressed refresh
// tokens.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use tokio::sync::RwLock;

use leitner_server::{
    errors::{AppError, AppResult},
    models::domain::{Question, RefreshToken, User, UserQueue},
    repositories::{QuestionRepository, QueueRepository, RefreshTokenRepository, UserRepository},
};

pub fn question_bank() -> Vec<Question> {
    let words = ["zero", "one", "two", "three", "four"];
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            Question::new(&format!("This is index {}", i), &format!("answer {}", word))
        })
        .collect()
}

pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AppError::AlreadyExists(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }

        let mut created = user;
        created.id = Some(ObjectId::new());
        users.insert(created.username.clone(), created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<Vec<Question>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            questions: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn find_all(&self) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(questions.clone())
    }

    async fn count(&self) -> AppResult<u64> {
        let questions = self.questions.read().await;
        Ok(questions.len() as u64)
    }

    async fn insert_many(&self, new_questions: Vec<Question>) -> AppResult<()> {
        let mut questions = self.questions.write().await;
        for question in new_questions {
            if questions.iter().any(|q| q.id == question.id) {
                return Err(AppError::AlreadyExists(format!(
                    "Question with id '{}' already exists",
                    question.id
                )));
            }
            questions.push(question);
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryQueueRepository {
    queues: Arc<RwLock<HashMap<String, UserQueue>>>,
}

impl InMemoryQueueRepository {
    pub fn new() -> Self {
        Self {
            queues: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QueueRepository for InMemoryQueueRepository {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<UserQueue>> {
        let queues = self.queues.read().await;
        Ok(queues.get(user_id).cloned())
    }

    async fn create(&self, queue: UserQueue) -> AppResult<UserQueue> {
        let mut queues = self.queues.write().await;
        if queues.contains_key(&queue.user_id) {
            return Err(AppError::AlreadyExists(format!(
                "Review queue for user '{}' already exists",
                queue.user_id
            )));
        }

        let mut created = queue;
        created.id = Some(ObjectId::new());
        queues.insert(created.user_id.clone(), created.clone());
        Ok(created)
    }

    async fn save_if_revision(&self, queue: UserQueue) -> AppResult<UserQueue> {
        let mut queues = self.queues.write().await;
        let revision_matches = queues
            .get(&queue.user_id)
            .map(|stored| stored.revision == queue.revision)
            .unwrap_or(false);

        if !revision_matches {
            return Err(AppError::Conflict(format!(
                "Review queue for user '{}' was modified concurrently",
                queue.user_id
            )));
        }

        let mut updated = queue;
        updated.revision += 1;
        updated.modified_at = Utc::now();
        queues.insert(updated.user_id.clone(), updated.clone());
        Ok(updated)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryRefreshTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> AppResult<RefreshToken> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token_hash) {
            return Err(AppError::AlreadyExists(
                "Refresh token already recorded".to_string(),
            ));
        }
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(hash).cloned())
    }

    async fn revoke_by_token_hash(&self, hash: &str) -> AppResult<()> {
        let mut tokens = self.tokens.write().await;
        let token = tokens
            .get_mut(hash)
            .ok_or_else(|| AppError::NotFound("Refresh token not found".to_string()))?;
        token.revoked = true;
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> AppResult<u64> {
        let mut tokens = self.tokens.write().await;
        let mut revoked = 0;
        for token in tokens.values_mut() {
            if token.user_id == user_id && !token.revoked {
                token.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        let mut tokens = self.tokens.write().await;
        let now = BsonDateTime::now();
        let before = tokens.len();
        tokens.retain(|_, token| token.expires_at >= now);
        Ok((before - tokens.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}
