use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::dto::request::CreateUserRequest;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string. Never leaves the persistence layer; DTOs carry the
    /// other fields only.
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: &str, first_name: &str, last_name: &str, password_hash: &str) -> Self {
        User {
            id: None,
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn from_request(request: CreateUserRequest, password_hash: String) -> Self {
        User {
            id: None,
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            password_hash,
            created_at: Some(Utc::now()),
        }
    }

    /// Subject used in JWT claims and as the queue-store key: the ObjectId
    /// hex once persisted, falling back to the username before that.
    pub fn subject(&self) -> String {
        self.id
            .as_ref()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| self.username.clone())
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(username: &str) -> Self {
        Self::test_user_with_hash(username, "unusable-hash")
    }

    pub fn test_user_with_hash(username: &str, password_hash: &str) -> Self {
        let mut user = User::new(username, "Test", "User", password_hash);
        user.id = Some(ObjectId::new());
        user
    }
}
