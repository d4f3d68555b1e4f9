// Upstream summary source - delegates parsing and aggregation to a backend
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::summary_source::SummarySource;
use crate::domain::summary::DatasetSummary;
use crate::infrastructure::api_mapper::{summary_from_payload, DatasetPayload};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct UpstreamSummarySource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl UpstreamSummarySource {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/", self.base_url)
    }

    async fn post_file(&self, file_name: &str, contents: Bytes) -> Result<(StatusCode, Bytes)> {
        let part = reqwest::multipart::Part::bytes(contents.to_vec())
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self.client.post(self.upload_url()).multipart(form);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Token {}", token));
        }

        let response = request
            .send()
            .await
            .context("Failed to send upload to upstream backend")?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .context("Failed to read upstream response body")?;
        Ok((status, body))
    }
}

#[async_trait]
impl SummarySource for UpstreamSummarySource {
    async fn summarize(&self, file_name: &str, contents: Bytes) -> ServiceResult<DatasetSummary> {
        tracing::debug!("Forwarding {} ({} bytes) to {}", file_name, contents.len(), self.upload_url());
        let (status, body) = self
            .post_file(file_name, contents)
            .await
            .map_err(ServiceError::Upstream)?;
        interpret_response(status, &body)
    }
}

// The backend reports a rejected CSV as 400 with an `error` body
fn interpret_response(status: StatusCode, body: &[u8]) -> ServiceResult<DatasetSummary> {
    if status == StatusCode::BAD_REQUEST {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());
        tracing::warn!("Upstream rejected upload: {}", message);
        return Err(ServiceError::InvalidCsv(message));
    }
    if !status.is_success() {
        return Err(ServiceError::Upstream(anyhow::anyhow!(
            "upstream upload failed with status {}",
            status
        )));
    }

    let payload: DatasetPayload = serde_json::from_slice(body)
        .context("Failed to parse upstream dataset payload")
        .map_err(ServiceError::Upstream)?;
    Ok(summary_from_payload(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_joins_once() {
        let with_slash = UpstreamSummarySource::new("http://localhost:8001/api/".to_string(), None);
        let without = UpstreamSummarySource::new("http://localhost:8001/api".to_string(), None);
        assert_eq!(with_slash.upload_url(), "http://localhost:8001/api/upload/");
        assert_eq!(without.upload_url(), with_slash.upload_url());
    }

    #[test]
    fn test_success_maps_payload() {
        let body = br#"{"id": 7, "total_equipment": 1, "avg_flowrate": 12.5,
            "type_distribution": {"Pump": 1},
            "data": [{"equipmentName": "P-1", "type": "Pump", "flowrate": 12.5}]}"#;
        let summary = interpret_response(StatusCode::CREATED, body).unwrap();
        assert_eq!(summary.id, "7");
        assert_eq!(summary.total_count, 1);
        assert_eq!(summary.records[0].name, "P-1");
        assert_eq!(summary.records[0].pressure, 0.0);
    }

    #[test]
    fn test_bad_request_is_invalid_csv() {
        let result = interpret_response(StatusCode::BAD_REQUEST, br#"{"error": "Invalid CSV file"}"#);
        assert!(matches!(result, Err(ServiceError::InvalidCsv(msg)) if msg == "Invalid CSV file"));
    }

    #[test]
    fn test_server_error_is_upstream() {
        let result = interpret_response(StatusCode::BAD_GATEWAY, b"");
        assert!(matches!(result, Err(ServiceError::Upstream(_))));

        let garbage = interpret_response(StatusCode::OK, b"<html>");
        assert!(matches!(garbage, Err(ServiceError::Upstream(_))));
    }
}
