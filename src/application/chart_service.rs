// Chart service - Use case for the battery level chart
use crate::application::energy_repository::EnergyRepository;
use crate::application::error::{DashboardError, DashboardResult};
use crate::domain::battery::BatterySeries;
use crate::domain::chart::{
    ChartOptions, TooltipFormatter, BATTERY_MOUNT_POINT, BATTERY_SERIES_NAME,
};
use crate::infrastructure::templates::{render, PageTemplates};
use chrono::Local;
use html_escape::encode_safe;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChartService {
    repository: Arc<dyn EnergyRepository>,
    templates: Arc<PageTemplates>,
}

impl ChartService {
    pub fn new(repository: Arc<dyn EnergyRepository>, templates: Arc<PageTemplates>) -> Self {
        Self {
            repository,
            templates,
        }
    }

    pub async fn battery_series(&self, location: &str, hours: i32) -> DashboardResult<BatterySeries> {
        let series = BatterySeries::new(self.repository.battery_history(location, hours).await?);
        if series.is_empty() {
            tracing::warn!(location, hours, "no battery samples in range");
        } else {
            tracing::debug!(location, hours, samples = series.len(), "fetched battery history");
        }
        Ok(series)
    }

    pub async fn battery_chart(&self, location: &str, hours: i32) -> DashboardResult<ChartOptions> {
        let series = self.battery_series(location, hours).await?;
        Ok(ChartOptions::battery_level(&series))
    }

    /// Script that mounts the battery chart once the page has loaded.
    pub async fn chart_script(&self, location: &str, hours: i32) -> DashboardResult<String> {
        let chart = self.battery_chart(location, hours).await?;
        let graph_data = chart
            .series
            .first()
            .map(|s| s.data.to_graph_data())
            .unwrap_or_else(|| "[]".to_string());
        let options = chart
            .to_json()
            .map_err(|e| DashboardError::Render(e.to_string()))?;

        let mut vars = HashMap::new();
        vars.insert("MountPoint", BATTERY_MOUNT_POINT.to_string());
        vars.insert("ChartOptions", options);
        vars.insert("BatteryGraphData", graph_data);

        Ok(render(&self.templates.battery_chart, &vars))
    }

    /// HTML page hosting the chart mount point.
    pub async fn battery_page(&self, location: &str, hours: i32) -> DashboardResult<String> {
        let series = self.battery_series(location, hours).await?;
        let formatter = TooltipFormatter::new(Local);
        let last_sample = match series.latest() {
            Some(sample) => format!(
                "{}{}",
                formatter.header(BATTERY_SERIES_NAME),
                encode_safe(&formatter.point(sample))
            ),
            None => format!("No samples in the last {}h", hours),
        };

        let mut vars = HashMap::new();
        vars.insert("Location", encode_safe(&location.to_uppercase()).into_owned());
        vars.insert("MountPoint", BATTERY_MOUNT_POINT.to_string());
        vars.insert("LastSample", last_sample);
        vars.insert(
            "ChartScript",
            format!(
                "/battery/{}/chart.js?hours={}",
                urlencoding::encode(location),
                hours
            ),
        );

        Ok(render(&self.templates.battery, &vars))
    }
}
