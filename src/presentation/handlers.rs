// HTTP request handlers
use crate::application::error::{topic_for, DashboardError, DashboardResult};
use crate::infrastructure::html_mapper::sites_to_html;
use crate::infrastructure::http_response::{accepts_brotli, body_response, HTML, JAVASCRIPT, JSON};
use crate::infrastructure::templates::render;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use html_escape::encode_safe;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub hours: Option<i32>,
}

async fn respond(body: String, content_type: &'static str, headers: &HeaderMap) -> Response {
    match body_response(body, content_type, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

fn known_location(state: &AppState, location: &str) -> DashboardResult<()> {
    if state.settings.locations.iter().any(|l| l == location) {
        Ok(())
    } else {
        Err(DashboardError::NoData {
            topic: topic_for(location),
        })
    }
}

fn hours(state: &AppState, query: &RangeQuery) -> i32 {
    query.hours.unwrap_or(state.settings.history_hours).max(1)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Landing page
pub async fn index(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let mut vars = HashMap::new();
    vars.insert("Service", encode_safe(&state.settings.service).into_owned());
    vars.insert("Revision", encode_safe(&state.settings.revision).into_owned());

    respond(render(&state.templates.index, &vars), HTML, &headers).await
}

/// Latest readings and daily summaries for every configured location
pub async fn energy_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> DashboardResult<Response> {
    let sites = state
        .dashboard_service
        .energy_by_location(&state.settings.locations)
        .await?;

    let mut vars = HashMap::new();
    vars.insert("Sites", sites_to_html(&sites));

    Ok(respond(render(&state.templates.dashboard, &vars), HTML, &headers).await)
}

/// Page hosting the battery level chart for one location
pub async fn battery_page(
    Path(location): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> DashboardResult<Response> {
    known_location(&state, &location)?;
    let page = state
        .chart_service
        .battery_page(&location, hours(&state, &query))
        .await?;

    Ok(respond(page, HTML, &headers).await)
}

/// Script that builds the battery level chart
pub async fn battery_chart_script(
    Path(location): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> DashboardResult<Response> {
    known_location(&state, &location)?;
    let script = state
        .chart_service
        .chart_script(&location, hours(&state, &query))
        .await?;

    Ok(respond(script, JAVASCRIPT, &headers).await)
}

/// Raw battery series as `[[time_ms, percent], ...]`
pub async fn battery_series(
    Path(location): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> DashboardResult<Response> {
    known_location(&state, &location)?;
    let series = state
        .chart_service
        .battery_series(&location, hours(&state, &query))
        .await?;

    Ok(respond(series.to_graph_data(), JSON, &headers).await)
}
