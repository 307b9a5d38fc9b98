use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuestionRepository, MongoQueueRepository, MongoRefreshTokenRepository,
        MongoUserRepository, QuestionRepository, QueueRepository, RefreshTokenRepository,
        UserRepository,
    },
    services::{
        auth_service::AuthService, review_service::ReviewService,
        scheduler_service::SchedulerService, user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub review_service: Arc<ReviewService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the Mongo-backed repositories into the service layer. Index
    /// creation and the expired-token sweep run here, before the server
    /// accepts traffic.
    pub async fn new(config: Config, db: &Database, jwt_service: JwtService) -> AppResult<Self> {
        let user_repository = Arc::new(MongoUserRepository::new(db));
        user_repository.ensure_indexes().await?;

        let question_repository = Arc::new(MongoQuestionRepository::new(db));
        question_repository.ensure_indexes().await?;

        let queue_repository = Arc::new(MongoQueueRepository::new(db));
        queue_repository.ensure_indexes().await?;

        let refresh_token_repository = Arc::new(MongoRefreshTokenRepository::new(db));
        refresh_token_repository.ensure_indexes().await?;

        let removed = refresh_token_repository.delete_expired().await?;
        if removed > 0 {
            log::info!("Removed {} expired refresh tokens", removed);
        }

        let scheduler = SchedulerService::new(config.incorrect_offset);

        Ok(Self::from_parts(
            config,
            Arc::new(UserService::new(user_repository.clone())),
            Arc::new(AuthService::new(
                user_repository,
                refresh_token_repository,
                jwt_service,
            )),
            Arc::new(ReviewService::new(
                question_repository,
                queue_repository,
                scheduler,
            )),
        ))
    }

    /// Assembly from pre-built services; lets tests wire in repositories
    /// that never touch Mongo.
    pub fn from_parts(
        config: Config,
        user_service: Arc<UserService>,
        auth_service: Arc<AuthService>,
        review_service: Arc<ReviewService>,
    ) -> Self {
        Self {
            user_service,
            auth_service,
            review_service,
            config: Arc::new(config),
        }
    }
}
