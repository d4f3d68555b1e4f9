// User account and API token domain models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    /// Argon2 PHC string, never the plaintext
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub key: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn issue(email: &str) -> Self {
        Self {
            key: uuid::Uuid::new_v4().simple().to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_unique_keys() {
        let a = AuthToken::issue("ops@plant.io");
        let b = AuthToken::issue("ops@plant.io");
        assert_ne!(a.key, b.key);
        assert_eq!(a.key.len(), 32);
        assert_eq!(a.email, "ops@plant.io");
    }
}
