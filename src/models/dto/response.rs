use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{QueueNode, User};

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            username: user.username,
            full_name: format!("{} {}", user.first_name, user.last_name),
            created_at: user.created_at,
        }
    }
}

/// Wire shape of a review-queue node: all node fields plus the successor
/// slot (`null` for the tail). Pure projection; building one never touches
/// storage.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDto {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub times_asked: u32,
    pub correct_count: u32,
    pub next: Option<u32>,
}

impl From<&QueueNode> for QuestionDto {
    fn from(node: &QueueNode) -> Self {
        QuestionDto {
            id: node.id.clone(),
            question: node.question.clone(),
            answer: node.answer.clone(),
            times_asked: node.times_asked,
            correct_count: node.correct_count,
            next: node.next,
        }
    }
}

/// Response of `PUT /api/questions`: whether the submission was counted as
/// correct, the canonical answer of the graded question, and that question's
/// node as it stands after re-threading.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcomeDto {
    pub correct: bool,
    pub answer: String,
    pub question: QuestionDto,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: String,
}
