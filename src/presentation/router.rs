// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::auth::{login, logout, register, require_auth};
use crate::presentation::handlers::{
    clear_history, current_dataset, dataset_dashboard, dataset_pdf, dataset_records, health_check,
    list_history, select_dataset, upload_dataset,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: Arc<AppState>) -> Router {
    let datasets = Router::new()
        .route("/api/upload/", post(upload_dataset))
        .route("/api/history/", get(list_history).delete(clear_history))
        .route("/api/history/:id/select/", post(select_dataset))
        .route("/api/current/", get(current_dataset))
        .route("/api/datasets/:id/records/", get(dataset_records))
        .route("/api/datasets/:id/dashboard/", get(dataset_dashboard))
        .route("/api/datasets/:id/pdf/", get(dataset_pdf))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Compression is applied per response in http_response, so no CompressionLayer here
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/auth/register/", post(register))
        .route("/api/auth/login/", post(login))
        .route("/api/auth/logout/", post(logout))
        .merge(datasets)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
