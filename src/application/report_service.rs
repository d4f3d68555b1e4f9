// Report service - Use case for exporting a dataset as PDF
use crate::application::dataset_store::DatasetStore;
use crate::application::error::{ServiceError, ServiceResult};
use crate::infrastructure::pdf_report;
use anyhow::Context;
use chrono::Utc;

#[derive(Debug, Clone)]
pub struct Report {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ReportService {
    store: DatasetStore,
}

impl ReportService {
    pub fn new(store: DatasetStore) -> Self {
        Self { store }
    }

    pub async fn render_pdf(&self, dataset_id: &str) -> ServiceResult<Report> {
        let summary = self
            .store
            .find(dataset_id)
            .await
            .ok_or(ServiceError::NotFound)?;

        let file_name = format!("equipment_report_{}.pdf", summary.id);
        let bytes = tokio::task::spawn_blocking(move || pdf_report::render(&summary, Utc::now()))
            .await
            .context("PDF rendering task failed")??;

        tracing::debug!("Rendered {} ({} bytes)", file_name, bytes.len());
        Ok(Report { file_name, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::DatasetSummary;
    use crate::infrastructure::memory_repository::MemoryRepository;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_render_known_dataset() {
        let store = DatasetStore::new(Arc::new(MemoryRepository::default()));
        let summary = store.upload(DatasetSummary::summarize("plant.csv", vec![])).await;

        let report = ReportService::new(store).render_pdf(&summary.id).await.unwrap();
        assert_eq!(report.file_name, format!("equipment_report_{}.pdf", summary.id));
        assert!(report.bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_render_unknown_dataset() {
        let store = DatasetStore::new(Arc::new(MemoryRepository::default()));
        let result = ReportService::new(store).render_pdf("missing").await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
