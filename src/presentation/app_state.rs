// Application state for HTTP handlers
use crate::application::auth_service::AuthService;
use crate::application::dashboard_service::DashboardService;
use crate::application::dataset_store::DatasetStore;
use crate::application::report_service::ReportService;
use crate::application::upload_service::UploadService;

#[derive(Clone)]
pub struct AppState {
    pub upload_service: UploadService,
    pub dataset_store: DatasetStore,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
    pub auth_service: AuthService,
    pub auth_required: bool,
}
