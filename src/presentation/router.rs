// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    battery_chart_script, battery_page, battery_series, energy_dashboard, health_check, index,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.settings.assets_dir);

    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health_check))
        .route("/energy", get(energy_dashboard))
        .route("/battery/:location", get(battery_page))
        .route("/battery/:location/chart.js", get(battery_chart_script))
        .route("/battery/:location/series", get(battery_series))
        .nest_service("/assets", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
