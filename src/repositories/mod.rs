pub mod question_repository;
pub mod queue_repository;
pub mod refresh_token_repository;
pub mod user_repository;

/// Mongo reports a unique-index violation as write error code 11000.
pub(crate) fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}

pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use queue_repository::{MongoQueueRepository, QueueRepository};
pub use refresh_token_repository::{MongoRefreshTokenRepository, RefreshTokenRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

#[cfg(test)]
pub use question_repository::MockQuestionRepository;
#[cfg(test)]
pub use queue_repository::MockQueueRepository;
#[cfg(test)]
pub use refresh_token_repository::MockRefreshTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
