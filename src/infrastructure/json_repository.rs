// Flat-file JSON repository for upload history, users and tokens
use crate::application::dataset_repository::DatasetRepository;
use crate::application::user_repository::UserRepository;
use crate::domain::summary::DatasetSummary;
use crate::domain::user::{AuthToken, User};
use crate::infrastructure::api_mapper::{summary_from_payload, summary_to_payload, DatasetPayload};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

const HISTORY_FILE: &str = "history.json";
const ACCOUNTS_FILE: &str = "users.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    users: HashMap<String, User>,
    #[serde(default)]
    tokens: HashMap<String, AuthToken>,
}

#[derive(Debug)]
pub struct JsonFileRepository {
    data_dir: PathBuf,
    accounts: RwLock<AccountsFile>,
    history_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Create the data directory if needed and load the accounts file
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let accounts = read_json::<AccountsFile>(&data_dir.join(ACCOUNTS_FILE))
            .await?
            .unwrap_or_default();
        tracing::info!(
            "Opened JSON store at {} ({} users)",
            data_dir.display(),
            accounts.users.len()
        );

        Ok(Self {
            data_dir,
            accounts: RwLock::new(accounts),
            history_lock: Mutex::new(()),
        })
    }

    fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    fn accounts_path(&self) -> PathBuf {
        self.data_dir.join(ACCOUNTS_FILE)
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

// Write to a sibling temp file, then rename over the target
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl DatasetRepository for JsonFileRepository {
    async fn load_history(&self) -> Result<Vec<DatasetSummary>> {
        let _guard = self.history_lock.lock().await;
        let payloads = read_json::<Vec<DatasetPayload>>(&self.history_path())
            .await?
            .unwrap_or_default();
        Ok(payloads.into_iter().map(summary_from_payload).collect())
    }

    async fn save_history(&self, history: &[Arc<DatasetSummary>]) -> Result<()> {
        let _guard = self.history_lock.lock().await;
        let payloads: Vec<DatasetPayload> = history.iter().map(|s| summary_to_payload(s)).collect();
        write_json(&self.history_path(), &payloads).await
    }
}

// Account changes are applied to a copy and only become visible once written
#[async_trait]
impl UserRepository for JsonFileRepository {
    async fn find_user(&self, email: &str) -> Result<Option<User>> {
        Ok(self.accounts.read().await.users.get(email).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<bool> {
        let mut accounts = self.accounts.write().await;
        if accounts.users.contains_key(&user.email) {
            return Ok(false);
        }
        let mut updated = accounts.clone();
        updated.users.insert(user.email.clone(), user);
        write_json(&self.accounts_path(), &updated).await?;
        *accounts = updated;
        Ok(true)
    }

    async fn get_or_create_token(&self, email: &str) -> Result<AuthToken> {
        let mut accounts = self.accounts.write().await;
        if let Some(token) = accounts.tokens.values().find(|t| t.email == email) {
            return Ok(token.clone());
        }
        let token = AuthToken::issue(email);
        let mut updated = accounts.clone();
        updated.tokens.insert(token.key.clone(), token.clone());
        write_json(&self.accounts_path(), &updated).await?;
        *accounts = updated;
        Ok(token)
    }

    async fn find_token(&self, key: &str) -> Result<Option<AuthToken>> {
        Ok(self.accounts.read().await.tokens.get(key).cloned())
    }

    async fn revoke_token(&self, key: &str) -> Result<bool> {
        let mut accounts = self.accounts.write().await;
        if !accounts.tokens.contains_key(key) {
            return Ok(false);
        }
        let mut updated = accounts.clone();
        updated.tokens.remove(key);
        write_json(&self.accounts_path(), &updated).await?;
        *accounts = updated;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::EquipmentRecord;
    use chrono::Utc;

    fn summary(name: &str) -> Arc<DatasetSummary> {
        Arc::new(DatasetSummary::summarize(
            name,
            vec![EquipmentRecord::new(
                "r1".to_string(),
                "HX-1".to_string(),
                "Exchanger".to_string(),
                12.0,
                3.5,
                140.0,
            )],
        ))
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let history = vec![summary("2.csv"), summary("1.csv")];

        let repo = JsonFileRepository::open(dir.path()).await.unwrap();
        assert!(repo.load_history().await.unwrap().is_empty());
        repo.save_history(&history).await.unwrap();

        let reopened = JsonFileRepository::open(dir.path()).await.unwrap();
        let loaded = reopened.load_history().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], *history[0]);
        assert_eq!(loaded[1].file_name, "1.csv");
    }

    #[tokio::test]
    async fn test_accounts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(dir.path()).await.unwrap();

        let user = User {
            email: "ops@plant.io".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            created_at: Utc::now(),
        };
        assert!(repo.insert_user(user.clone()).await.unwrap());
        assert!(!repo.insert_user(user).await.unwrap());

        let token = repo.get_or_create_token("ops@plant.io").await.unwrap();
        assert_eq!(repo.get_or_create_token("ops@plant.io").await.unwrap(), token);

        let reopened = JsonFileRepository::open(dir.path()).await.unwrap();
        assert!(reopened.find_user("ops@plant.io").await.unwrap().is_some());
        assert_eq!(reopened.find_token(&token.key).await.unwrap(), Some(token.clone()));
        assert_eq!(
            reopened.get_or_create_token("ops@plant.io").await.unwrap().key,
            token.key
        );

        assert!(reopened.revoke_token(&token.key).await.unwrap());
        assert!(!reopened.revoke_token(&token.key).await.unwrap());
    }

    fn user(email: &str) -> User {
        User {
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_failed_account_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::open(dir.path()).await.unwrap();
        assert!(repo.insert_user(user("kept@plant.io")).await.unwrap());
        let token = repo.get_or_create_token("kept@plant.io").await.unwrap();

        // A directory in the temp file's place makes every accounts write fail
        std::fs::create_dir(dir.path().join("users.json.tmp")).unwrap();

        assert!(repo.insert_user(user("a@b.c")).await.is_err());
        assert!(repo.find_user("a@b.c").await.unwrap().is_none());

        assert!(repo.get_or_create_token("other@plant.io").await.is_err());
        assert!(repo.revoke_token(&token.key).await.is_err());
        assert_eq!(repo.find_token(&token.key).await.unwrap(), Some(token.clone()));

        std::fs::remove_dir(dir.path().join("users.json.tmp")).unwrap();
        assert!(repo.insert_user(user("a@b.c")).await.unwrap());
        let reopened = JsonFileRepository::open(dir.path()).await.unwrap();
        assert!(reopened.find_user("a@b.c").await.unwrap().is_some());
        assert_eq!(reopened.find_token(&token.key).await.unwrap(), Some(token));
    }

    #[tokio::test]
    async fn test_corrupt_history_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(HISTORY_FILE), b"not json").unwrap();

        let repo = JsonFileRepository::open(dir.path()).await.unwrap();
        assert!(repo.load_history().await.is_err());
    }
}
