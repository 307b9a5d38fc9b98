use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Server-side record of an issued refresh token. Only the SHA-256 hash of
/// the token is stored; presenting a refresh token requires its hash to match
/// an un-revoked, un-expired record.
///
/// Timestamps are BSON-native dates so the expiry sweep's range filter
/// evaluates server-side.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RefreshToken {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: DateTime,
    pub created_at: DateTime,
    pub revoked: bool,
}

impl RefreshToken {
    /// Records a freshly issued token: hashes it and stamps the expiry.
    pub fn issue(user_id: &str, token: &str, ttl_hours: i64) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            user_id: user_id.to_string(),
            token_hash: hash_token(token),
            expires_at: DateTime::from_millis(now.timestamp_millis() + ttl_hours * MILLIS_PER_HOUR),
            created_at: now,
            revoked: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.revoked && self.expires_at > DateTime::now()
    }
}

pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
