// Auth service - Use cases for registration, login and token checks
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::user_repository::UserRepository;
use crate::domain::user::{AuthToken, User};
use anyhow::Context;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn register(&self, email: &str, password: &str) -> ServiceResult<AuthToken> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ServiceError::MissingCredentials);
        }

        if self.repository.find_user(email).await?.is_some() {
            return Err(ServiceError::UserExists);
        }

        let password_hash = hash_password(password.to_string()).await?;
        let user = User {
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        if !self.repository.insert_user(user).await? {
            return Err(ServiceError::UserExists);
        }

        tracing::info!("Registered user {}", email);
        self.token_for(email).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<AuthToken> {
        let email = email.trim();
        let user = self
            .repository
            .find_user(email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(password.to_string(), user.password_hash).await? {
            tracing::warn!("Failed login for {}", email);
            return Err(ServiceError::InvalidCredentials);
        }

        self.token_for(email).await
    }

    pub async fn logout(&self, key: &str) -> ServiceResult<()> {
        if !self.repository.revoke_token(key).await? {
            return Err(ServiceError::Unauthorized);
        }
        Ok(())
    }

    /// Resolve a token key to the email it was issued for
    pub async fn authenticate(&self, key: &str) -> ServiceResult<String> {
        self.repository
            .find_token(key)
            .await?
            .map(|token| token.email)
            .ok_or(ServiceError::Unauthorized)
    }

    // One token per user, created on first use
    async fn token_for(&self, email: &str) -> ServiceResult<AuthToken> {
        Ok(self.repository.get_or_create_token(email).await?)
    }
}

async fn hash_password(password: String) -> ServiceResult<String> {
    let hash = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))
    })
    .await
    .context("Password hashing task failed")??;

    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> ServiceResult<bool> {
    let matches = tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;
        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task failed")??;

    Ok(matches)
}
