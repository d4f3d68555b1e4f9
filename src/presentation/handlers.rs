// HTTP request handlers
use crate::application::error::ServiceError;
use crate::domain::table::{SortDirection, SortField, TableView};
use crate::infrastructure::api_mapper::{record_to_payload, summary_to_payload, DatasetPayload, RecordPayload};
use crate::infrastructure::http_response::{accepts_brotli, json_response, pdf_response};
use crate::presentation::app_state::AppState;
use crate::presentation::auth::AuthenticatedUser;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `sort`/`direction` describe the table as the client shows it; `click` is a
/// header click applied on top of that state.
#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    pub search: Option<String>,
    pub sort: Option<SortField>,
    pub direction: Option<SortDirection>,
    pub click: Option<SortField>,
}

impl RecordsQuery {
    fn view(self) -> TableView {
        let defaults = TableView::default();
        let mut view = TableView::new(
            self.sort.unwrap_or(defaults.sort_field),
            self.direction.unwrap_or(defaults.direction),
            self.search.unwrap_or_default(),
        );
        if let Some(field) = self.click {
            view.click(field);
        }
        view
    }
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub id: String,
    pub total: usize,
    pub sort: SortField,
    pub direction: SortDirection,
    pub data: Vec<RecordPayload>,
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, headers: &HeaderMap) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Accepts a multipart upload with the CSV in the `file` field
pub async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<AuthenticatedUser>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ServiceError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidCsv(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let contents = field
            .bytes()
            .await
            .map_err(|e| ServiceError::InvalidCsv(e.to_string()))?;
        upload = Some((file_name, contents));
        break;
    }

    let (file_name, contents) = upload.ok_or(ServiceError::UnsupportedFile)?;
    if let Some(Extension(AuthenticatedUser(email))) = &user {
        tracing::info!("{} uploaded {} ({} bytes)", email, file_name, contents.len());
    }

    let summary = state.upload_service.upload(&file_name, contents).await?;
    Ok(respond(StatusCode::CREATED, &summary_to_payload(&summary), &headers).await)
}

/// Upload history, newest first
pub async fn list_history(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let payloads: Vec<DatasetPayload> = state
        .dataset_store
        .history()
        .await
        .iter()
        .map(|s| summary_to_payload(s))
        .collect();
    respond(StatusCode::OK, &payloads, &headers).await
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> StatusCode {
    state.dataset_store.clear().await;
    StatusCode::NO_CONTENT
}

pub async fn current_dataset(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    let current = state
        .dataset_store
        .current()
        .await
        .ok_or(ServiceError::NotFound)?;
    Ok(respond(StatusCode::OK, &summary_to_payload(&current), &headers).await)
}

/// Make a history entry current; unknown ids leave the current dataset as is
pub async fn select_dataset(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    state.dataset_store.select(&id).await;
    current_dataset(State(state), headers).await
}

pub async fn dataset_records(
    Path(id): Path<String>,
    Query(query): Query<RecordsQuery>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    let summary = state
        .dataset_store
        .find(&id)
        .await
        .ok_or(ServiceError::NotFound)?;

    let view = query.view();
    let data: Vec<RecordPayload> = view
        .apply(&summary.records)
        .into_iter()
        .map(record_to_payload)
        .collect();
    let body = RecordsResponse {
        id: summary.id.clone(),
        total: summary.records.len(),
        sort: view.sort_field,
        direction: view.direction,
        data,
    };
    Ok(respond(StatusCode::OK, &body, &headers).await)
}

pub async fn dataset_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    let summary = state
        .dataset_store
        .find(&id)
        .await
        .ok_or(ServiceError::NotFound)?;
    let dashboard = state.dashboard_service.get_dashboard(&summary);
    Ok(respond(StatusCode::OK, &dashboard, &headers).await)
}

pub async fn dataset_pdf(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServiceError> {
    let report = state.report_service.render_pdf(&id).await?;
    Ok(match pdf_response(&report.file_name, report.bytes) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_to_name_ascending() {
        let view = RecordsQuery::default().view();
        assert_eq!(view, TableView::default());

        let view = RecordsQuery {
            search: Some("pump".to_string()),
            sort: Some(SortField::Pressure),
            direction: Some(SortDirection::Desc),
            click: None,
        }
        .view();
        assert_eq!(view.sort_field, SortField::Pressure);
        assert_eq!(view.direction, SortDirection::Desc);
        assert_eq!(view.search, "pump");
    }

    #[test]
    fn test_click_applies_on_top_of_current_state() {
        let same = RecordsQuery {
            sort: Some(SortField::Flowrate),
            direction: Some(SortDirection::Asc),
            click: Some(SortField::Flowrate),
            ..Default::default()
        }
        .view();
        assert_eq!(same.sort_field, SortField::Flowrate);
        assert_eq!(same.direction, SortDirection::Desc);

        let other = RecordsQuery {
            sort: Some(SortField::Flowrate),
            direction: Some(SortDirection::Desc),
            click: Some(SortField::Type),
            ..Default::default()
        }
        .view();
        assert_eq!(other.sort_field, SortField::Type);
        assert_eq!(other.direction, SortDirection::Asc);
    }
}
