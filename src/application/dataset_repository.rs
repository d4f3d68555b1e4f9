// Repository trait for upload history persistence
use crate::domain::summary::DatasetSummary;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Load persisted history, newest first
    async fn load_history(&self) -> anyhow::Result<Vec<DatasetSummary>>;

    /// Replace the persisted history with the given entries (newest first)
    async fn save_history(&self, history: &[Arc<DatasetSummary>]) -> anyhow::Result<()>;
}
