// Dataset store - current dataset plus capped upload history
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::history::History;
use crate::domain::summary::DatasetSummary;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreState {
    history: History,
    current: Option<Arc<DatasetSummary>>,
}

/// Owns the history and the "current" pointer. Everything else gets `Arc` clones.
#[derive(Clone)]
pub struct DatasetStore {
    state: Arc<RwLock<StoreState>>,
    repository: Arc<dyn DatasetRepository>,
}

impl DatasetStore {
    pub fn new(repository: Arc<dyn DatasetRepository>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            repository,
        }
    }

    /// Restore persisted history; the newest entry becomes current
    pub async fn load(repository: Arc<dyn DatasetRepository>) -> anyhow::Result<Self> {
        let entries: Vec<Arc<DatasetSummary>> = repository
            .load_history()
            .await?
            .into_iter()
            .map(Arc::new)
            .collect();

        let history = History::from_entries(entries);
        let current = history.newest();
        if history.is_empty() {
            tracing::info!("No upload history to restore");
        } else {
            tracing::info!("Restored {} datasets from history", history.len());
        }

        Ok(Self {
            state: Arc::new(RwLock::new(StoreState { history, current })),
            repository,
        })
    }

    /// Prepend to history, trim to capacity and make it current
    pub async fn upload(&self, summary: DatasetSummary) -> Arc<DatasetSummary> {
        let summary = Arc::new(summary);
        let mut state = self.state.write().await;
        state.history.push(summary.clone());
        state.current = Some(summary.clone());
        self.persist(&state.history).await;
        summary
    }

    /// Make a history entry current. Unknown ids leave the store untouched.
    pub async fn select(&self, id: &str) -> Option<Arc<DatasetSummary>> {
        let mut state = self.state.write().await;
        match state.history.find(id) {
            Some(summary) => {
                state.current = Some(summary.clone());
                Some(summary)
            }
            None => {
                tracing::debug!("Ignoring select of unknown dataset {}", id);
                None
            }
        }
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.history.clear();
        state.current = None;
        self.persist(&state.history).await;
    }

    pub async fn current(&self) -> Option<Arc<DatasetSummary>> {
        self.state.read().await.current.clone()
    }

    pub async fn history(&self) -> Vec<Arc<DatasetSummary>> {
        self.state.read().await.history.entries()
    }

    pub async fn find(&self, id: &str) -> Option<Arc<DatasetSummary>> {
        self.state.read().await.history.find(id)
    }

    // In-memory state stays authoritative when the write fails
    async fn persist(&self, history: &History) {
        if let Err(e) = self.repository.save_history(&history.entries()).await {
            tracing::error!("Failed to persist upload history: {:#}", e);
        }
    }
}
