// Service-level error taxonomy
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Please upload a CSV file")]
    UnsupportedFile,

    #[error("Invalid CSV file")]
    InvalidCsv(String),

    #[error("Email and password required")]
    MissingCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Dataset not found")]
    NotFound,

    #[error("Upstream request failed")]
    Upstream(#[source] anyhow::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
