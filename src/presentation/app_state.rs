// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::ServerSettings;
use crate::infrastructure::templates::PageTemplates;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub chart_service: ChartService,
    pub templates: Arc<PageTemplates>,
    pub settings: ServerSettings,
}
