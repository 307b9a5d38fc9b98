use once_cell::sync::Lazy;
use serde::Deserialize;
use validator::Validate;

static USERNAME_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9_]+$")
        .expect("USERNAME_REGEX is a valid regex pattern")
});

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username must be alphanumeric with underscores"
    ))]
    pub username: String,

    #[validate(length(min = 10, max = 72))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Body of `PUT /api/questions`. `question_id` must identify the question
/// currently at the head of the caller's queue; anything else is rejected as
/// stale rather than silently reordered.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1))]
    pub question_id: String,

    pub correct: bool,
}
