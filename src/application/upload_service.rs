// Upload service - Use case for turning an uploaded file into the current dataset
use crate::application::dataset_store::DatasetStore;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::summary_source::SummarySource;
use crate::domain::summary::DatasetSummary;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct UploadService {
    source: Arc<dyn SummarySource>,
    store: DatasetStore,
}

impl UploadService {
    pub fn new(source: Arc<dyn SummarySource>, store: DatasetStore) -> Self {
        Self { source, store }
    }

    pub async fn upload(&self, file_name: &str, contents: Bytes) -> ServiceResult<Arc<DatasetSummary>> {
        if !is_csv(file_name) {
            tracing::info!("Rejected upload of {}: not a CSV file", file_name);
            return Err(ServiceError::UnsupportedFile);
        }

        let summary = self.source.summarize(file_name, contents).await?;
        tracing::info!(
            "Aggregated {} ({} records, {} types)",
            file_name,
            summary.total_count,
            summary.type_count()
        );

        Ok(self.store.upload(summary).await)
    }
}

pub fn is_csv(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::summary_source::LocalSummarySource;
    use crate::infrastructure::memory_repository::MemoryRepository;

    fn service() -> (UploadService, DatasetStore) {
        let store = DatasetStore::new(Arc::new(MemoryRepository::default()));
        let service = UploadService::new(Arc::new(LocalSummarySource::default()), store.clone());
        (service, store)
    }

    #[test]
    fn test_is_csv() {
        assert!(is_csv("plant.csv"));
        assert!(is_csv("PLANT.CSV"));
        assert!(!is_csv("plant.xlsx"));
        assert!(!is_csv("csv"));
        assert!(!is_csv(""));
    }

    #[tokio::test]
    async fn test_upload_becomes_current() {
        let (service, store) = service();
        let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\nR-1,Reactor,10,2,150\n";

        let summary = service.upload("run.csv", Bytes::from(csv)).await.unwrap();
        assert_eq!(store.current().await.unwrap().id, summary.id);
        assert_eq!(summary.average_temperature, 150.0);
    }

    #[tokio::test]
    async fn test_rejected_upload_leaves_state() {
        let (service, store) = service();
        let csv = "Equipment Name,Type\nR-1,Reactor\n";
        let kept = service.upload("first.csv", Bytes::from(csv)).await.unwrap();

        let result = service.upload("notes.txt", Bytes::from(csv)).await;
        assert!(matches!(result, Err(ServiceError::UnsupportedFile)));
        assert_eq!(store.history().await.len(), 1);
        assert_eq!(store.current().await.unwrap().id, kept.id);
    }
}
