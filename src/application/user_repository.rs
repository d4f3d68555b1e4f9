// Repository trait for user accounts and API tokens
use crate::domain::user::{AuthToken, User};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Insert a new user. Returns false when the email is already taken.
    async fn insert_user(&self, user: User) -> anyhow::Result<bool>;

    /// The user's token, issued on first call. Lookup and insert happen atomically.
    async fn get_or_create_token(&self, email: &str) -> anyhow::Result<AuthToken>;

    async fn find_token(&self, key: &str) -> anyhow::Result<Option<AuthToken>>;

    /// Returns false when no such token existed
    async fn revoke_token(&self, key: &str) -> anyhow::Result<bool>;
}
