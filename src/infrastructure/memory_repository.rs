// In-memory repositories, used when persistence is disabled
use crate::application::dataset_repository::DatasetRepository;
use crate::application::user_repository::UserRepository;
use crate::domain::summary::DatasetSummary;
use crate::domain::user::{AuthToken, User};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryRepository {
    history: RwLock<Vec<DatasetSummary>>,
    users: RwLock<HashMap<String, User>>,
    tokens: RwLock<HashMap<String, AuthToken>>,
}

#[async_trait]
impl DatasetRepository for MemoryRepository {
    async fn load_history(&self) -> Result<Vec<DatasetSummary>> {
        Ok(self.history.read().await.clone())
    }

    async fn save_history(&self, history: &[Arc<DatasetSummary>]) -> Result<()> {
        *self.history.write().await = history.iter().map(|s| s.as_ref().clone()).collect();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn find_user(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<bool> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Ok(false);
        }
        users.insert(user.email.clone(), user);
        Ok(true)
    }

    async fn get_or_create_token(&self, email: &str) -> Result<AuthToken> {
        let mut tokens = self.tokens.write().await;
        if let Some(token) = tokens.values().find(|t| t.email == email) {
            return Ok(token.clone());
        }
        let token = AuthToken::issue(email);
        tokens.insert(token.key.clone(), token.clone());
        Ok(token)
    }

    async fn find_token(&self, key: &str) -> Result<Option<AuthToken>> {
        Ok(self.tokens.read().await.get(key).cloned())
    }

    async fn revoke_token(&self, key: &str) -> Result<bool> {
        Ok(self.tokens.write().await.remove(key).is_some())
    }
}
