// Repository trait for energy telemetry access
use crate::domain::battery::BatterySample;
use crate::domain::energy::EnergyReading;
use async_trait::async_trait;

#[async_trait]
pub trait EnergyRepository: Send + Sync {
    /// Most recent reading for a location, if it has reported at all
    async fn latest_reading(&self, location: &str) -> anyhow::Result<Option<EnergyReading>>;

    /// Battery percentage samples over the last `hours`, oldest first.
    /// May be downsampled for charting; daily statistics use `readings`.
    async fn battery_history(&self, location: &str, hours: i32) -> anyhow::Result<Vec<BatterySample>>;

    /// Full readings over the last `hours` (for daily power summaries)
    async fn readings(&self, location: &str, hours: i32) -> anyhow::Result<Vec<EnergyReading>>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;

    /// Canned repository for service and handler tests.
    #[derive(Default)]
    pub struct StaticRepository {
        pub latest: HashMap<String, EnergyReading>,
        pub batteries: HashMap<String, Vec<BatterySample>>,
        pub readings: HashMap<String, Vec<EnergyReading>>,
        pub failing_history: bool,
    }

    #[async_trait]
    impl EnergyRepository for StaticRepository {
        async fn latest_reading(&self, location: &str) -> anyhow::Result<Option<EnergyReading>> {
            Ok(self.latest.get(location).cloned())
        }

        async fn battery_history(&self, location: &str, _hours: i32) -> anyhow::Result<Vec<BatterySample>> {
            if self.failing_history {
                anyhow::bail!("history unavailable");
            }
            Ok(self.batteries.get(location).cloned().unwrap_or_default())
        }

        async fn readings(&self, location: &str, _hours: i32) -> anyhow::Result<Vec<EnergyReading>> {
            if self.failing_history {
                anyhow::bail!("history unavailable");
            }
            Ok(self.readings.get(location).cloned().unwrap_or_default())
        }
    }
}
