// Dashboard service - Use case for the per-location energy overview
use crate::application::energy_repository::EnergyRepository;
use crate::application::error::{topic_for, DashboardError, DashboardResult};
use crate::domain::battery::BatterySample;
use crate::domain::energy::{summarize_battery_days, summarize_power_days, EnergyReading, SiteStats};
use chrono::Local;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn EnergyRepository>,
    history_hours: i32,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn EnergyRepository>, history_hours: i32) -> Self {
        Self {
            repository,
            history_hours,
        }
    }

    /// Current stats for each location, in the order given.
    /// Fails if any location has never reported.
    pub async fn energy_by_location(&self, locations: &[String]) -> DashboardResult<Vec<SiteStats>> {
        let results = join_all(locations.iter().map(|l| self.site_stats(l))).await;
        results.into_iter().collect()
    }

    async fn site_stats(&self, location: &str) -> DashboardResult<SiteStats> {
        let start = Instant::now();

        let reading = self
            .repository
            .latest_reading(location)
            .await?
            .ok_or_else(|| DashboardError::NoData {
                topic: topic_for(location),
            })?;

        let mut stats = SiteStats::from_reading(location, &reading);

        // History is best effort: the page renders with whatever is available.
        // Daily stats come from raw readings, never from a downsampled series.
        match self.repository.readings(location, self.history_hours).await {
            Ok(readings) => {
                let samples: Vec<BatterySample> =
                    readings.iter().filter_map(EnergyReading::battery_sample).collect();
                stats.pct_history = summarize_battery_days(&samples, &Local);
                stats.stats_history = summarize_power_days(&readings, &Local);
            }
            Err(e) => tracing::error!(location, error = %e, "failed to fetch history"),
        }

        stats.query_time = start.elapsed();
        tracing::debug!(
            location,
            days = stats.stats_history.len(),
            query_ms = stats.query_time.as_millis() as u64,
            "built site stats"
        );

        Ok(stats)
    }
}
