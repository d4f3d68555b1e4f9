// Application layer - Use cases and repository seams
pub mod auth_service;
pub mod dashboard_service;
pub mod dataset_repository;
pub mod dataset_store;
pub mod error;
pub mod report_service;
pub mod summary_source;
pub mod upload_service;
pub mod user_repository;
