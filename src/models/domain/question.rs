use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the shared question bank. Bank content is authored outside
/// this service; entries are only read here, once per user, to seed that
/// user's review queue.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn new(question: &str, answer: &str) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            created_at: Some(Utc::now()),
        }
    }
}
