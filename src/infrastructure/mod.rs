// Infrastructure layer - External dependencies and adapters
pub mod api_mapper;
pub mod config;
pub mod csv_reader;
pub mod http_response;
pub mod json_repository;
pub mod memory_repository;
pub mod pdf_report;
pub mod upstream_client;
