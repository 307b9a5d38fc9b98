use crate::models::domain::{Question, ReviewQueue, User};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Creates a standard test user
    pub fn test_user() -> User {
        User::new("testuser", "Test", "User", "$argon2id$stub")
    }

    /// Creates a test user with custom username
    pub fn test_user_with_username(username: &str) -> User {
        User::new(username, "Test", "User", "$argon2id$stub")
    }

    /// Five-question bank with predictable texts, in seeding order.
    pub fn question_bank() -> Vec<Question> {
        let words = ["zero", "one", "two", "three", "four"];
        words
            .iter()
            .enumerate()
            .map(|(i, word)| Question::new(&format!("This is index {}", i), &format!("answer {}", word)))
            .collect()
    }

    /// A queue freshly seeded from [`question_bank`]: chain 0 -> 1 -> 2 -> 3 -> 4.
    pub fn seeded_queue() -> ReviewQueue {
        ReviewQueue::seed(&question_bank())
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_test_user() {
        let user = test_user();
        assert_eq!(user.username, "testuser");
        assert_eq!(user.first_name, "Test");
    }

    #[test]
    fn test_fixtures_question_bank() {
        let bank = question_bank();
        assert_eq!(bank.len(), 5);
        assert_eq!(bank[0].question, "This is index 0");
        assert_eq!(bank[0].answer, "answer zero");
        assert_eq!(bank[4].question, "This is index 4");
        assert_eq!(bank[4].answer, "answer four");
    }

    #[test]
    fn test_fixtures_seeded_queue() {
        let queue = seeded_queue();
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.head, Some(0));
    }
}
