// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::auth_service::AuthService;
use crate::application::dashboard_service::DashboardService;
use crate::application::dataset_repository::DatasetRepository;
use crate::application::dataset_store::DatasetStore;
use crate::application::report_service::ReportService;
use crate::application::summary_source::{LocalSummarySource, SummarySource};
use crate::application::upload_service::UploadService;
use crate::application::user_repository::UserRepository;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::json_repository::JsonFileRepository;
use crate::infrastructure::memory_repository::MemoryRepository;
use crate::infrastructure::upstream_client::UpstreamSummarySource;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_app_config().context("Failed to load configuration")?;

    // Initialize tracing; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create repositories (infrastructure layer)
    let (datasets, users): (Arc<dyn DatasetRepository>, Arc<dyn UserRepository>) =
        if config.storage.persist {
            let repository = Arc::new(JsonFileRepository::open(config.storage.data_dir.clone()).await?);
            let datasets: Arc<dyn DatasetRepository> = repository.clone();
            let users: Arc<dyn UserRepository> = repository;
            (datasets, users)
        } else {
            tracing::info!("Persistence disabled, keeping history in memory");
            let repository = Arc::new(MemoryRepository::default());
            let datasets: Arc<dyn DatasetRepository> = repository.clone();
            let users: Arc<dyn UserRepository> = repository;
            (datasets, users)
        };

    let store = match DatasetStore::load(datasets.clone()).await {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Could not restore upload history, starting empty: {:#}", e);
            DatasetStore::new(datasets)
        }
    };

    let source: Arc<dyn SummarySource> = match &config.upstream {
        Some(upstream) => {
            tracing::info!("Delegating aggregation to {}", upstream.base_url);
            Arc::new(UpstreamSummarySource::new(
                upstream.base_url.clone(),
                upstream.token.clone(),
            ))
        }
        None => Arc::new(LocalSummarySource::new(config.aliases.clone())),
    };

    // Create services (application layer)
    let state = Arc::new(AppState {
        upload_service: UploadService::new(source, store.clone()),
        dataset_store: store.clone(),
        dashboard_service: DashboardService::new(),
        report_service: ReportService::new(store),
        auth_service: AuthService::new(users),
        auth_required: config.auth.required,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr = config.server.socket_addr()?;
    tracing::info!("Starting equipment-analytics service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router).await?;

    Ok(())
}
