// ServiceError to HTTP response mapping
use crate::application::error::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::UnsupportedFile
            | ServiceError::InvalidCsv(_)
            | ServiceError::MissingCredentials
            | ServiceError::UserExists => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCredentials | ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            ServiceError::Internal(e) => tracing::error!("Internal error: {:#}", e),
            ServiceError::Upstream(e) => tracing::error!("Upstream error: {:#}", e),
            ServiceError::InvalidCsv(detail) => tracing::debug!("Invalid CSV: {}", detail),
            _ => {}
        }

        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
