use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{ReviewQueue, UserQueue},
        dto::response::{AnswerOutcomeDto, QuestionDto},
    },
    repositories::{QuestionRepository, QueueRepository},
    services::scheduler_service::SchedulerService,
};

/// How many times a conditional save is retried before the conflict is
/// surfaced to the caller.
const MAX_SAVE_ATTEMPTS: usize = 3;

/// Ties the pure scheduler to storage: loads (or seeds) a user's queue,
/// applies an answer and persists the result with a revision-checked write.
pub struct ReviewService {
    questions: Arc<dyn QuestionRepository>,
    queues: Arc<dyn QueueRepository>,
    scheduler: SchedulerService,
}

impl ReviewService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        queues: Arc<dyn QueueRepository>,
        scheduler: SchedulerService,
    ) -> Self {
        Self {
            questions,
            queues,
            scheduler,
        }
    }

    /// The question currently due for the user. A user with no queue yet
    /// gets one seeded from the question bank on this first access.
    pub async fn current_question(&self, user_id: &str) -> AppResult<QuestionDto> {
        let user_queue = self.load_or_seed(user_id).await?;
        let node = self.scheduler.current(&user_queue.queue)?;
        Ok(QuestionDto::from(node))
    }

    /// Applies one answer for the user and persists the re-threaded queue.
    ///
    /// The save is conditional on the revision the queue was loaded at. On a
    /// conflict the whole load-apply-save cycle is retried; if the answered
    /// question is no longer at the head after a reload the retry ends in a
    /// stale-answer rejection, which is the honest outcome of that race.
    pub async fn submit_answer(
        &self,
        user_id: &str,
        question_id: &str,
        correct: bool,
    ) -> AppResult<AnswerOutcomeDto> {
        let mut attempt = 0;

        loop {
            let mut user_queue = self.load_or_seed(user_id).await?;
            let slot = self
                .scheduler
                .submit_answer(&mut user_queue.queue, question_id, correct)?;

            match self.queues.save_if_revision(user_queue).await {
                Ok(saved) => {
                    let node = saved.queue.node_at(slot)?;
                    return Ok(AnswerOutcomeDto {
                        correct,
                        answer: node.answer.clone(),
                        question: QuestionDto::from(node),
                    });
                }
                Err(AppError::Conflict(message)) => {
                    attempt += 1;
                    if attempt >= MAX_SAVE_ATTEMPTS {
                        return Err(AppError::Conflict(message));
                    }
                    log::warn!(
                        "Concurrent queue update for user '{}', retrying (attempt {})",
                        user_id,
                        attempt + 1
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn load_or_seed(&self, user_id: &str) -> AppResult<UserQueue> {
        if let Some(existing) = self.queues.find_by_user(user_id).await? {
            existing.queue.validate()?;
            return Ok(existing);
        }

        let bank = self.questions.find_all().await?;
        let seeded = UserQueue::new(user_id, ReviewQueue::seed(&bank));

        // An empty queue is not persisted; the next access seeds again once
        // the bank has content.
        if seeded.queue.is_empty() {
            return Ok(seeded);
        }

        match self.queues.create(seeded).await {
            Ok(created) => {
                log::info!(
                    "Seeded review queue of {} questions for user '{}'",
                    created.queue.len(),
                    user_id
                );
                Ok(created)
            }
            // Lost the first-access race; the winner's queue is authoritative.
            Err(AppError::AlreadyExists(_)) => {
                self.queues.find_by_user(user_id).await?.ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Review queue for user '{}' disappeared after create conflict",
                        user_id
                    ))
                })
            }
            Err(e) => Err(e),
        }
    }
}
