// Summary sources - where an uploaded file gets aggregated
use crate::application::error::{ServiceError, ServiceResult};
use crate::domain::equipment::{normalize_rows, AliasTable};
use crate::domain::summary::DatasetSummary;
use crate::infrastructure::csv_reader::read_rows;
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait SummarySource: Send + Sync {
    async fn summarize(&self, file_name: &str, contents: Bytes) -> ServiceResult<DatasetSummary>;
}

/// Parses and aggregates in-process
#[derive(Debug, Clone, Default)]
pub struct LocalSummarySource {
    aliases: AliasTable,
}

impl LocalSummarySource {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }
}

#[async_trait]
impl SummarySource for LocalSummarySource {
    async fn summarize(&self, file_name: &str, contents: Bytes) -> ServiceResult<DatasetSummary> {
        let aliases = self.aliases.clone();
        let file_name = file_name.to_string();

        tokio::task::spawn_blocking(move || -> ServiceResult<DatasetSummary> {
            let rows = read_rows(&contents).map_err(|e| ServiceError::InvalidCsv(e.to_string()))?;
            let records = normalize_rows(&rows, &aliases);
            tracing::debug!(
                "Normalized {} of {} rows from {}",
                records.len(),
                rows.len(),
                file_name
            );
            Ok(DatasetSummary::summarize(file_name, records))
        })
        .await
        .context("CSV aggregation task failed")?
    }
}
