// Energy telemetry domain models
use super::battery::BatterySample;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// One telemetry row for a site. Powers are in watts; a field the row did not carry is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReading {
    pub as_of: DateTime<Utc>,
    pub battery_percent: Option<f64>,
    pub site_power: Option<f64>,
    pub load_power: Option<f64>,
    pub battery_power: Option<f64>,
    pub solar_power: Option<f64>,
}

impl EnergyReading {
    pub fn battery_sample(&self) -> Option<BatterySample> {
        self.battery_percent
            .map(|pct| BatterySample::new(self.as_of.timestamp_millis(), pct))
    }
}

/// Current state and history of one location, as shown on the dashboard.
#[derive(Debug, Clone)]
pub struct SiteStats {
    pub location: String,
    pub as_of: DateTime<Local>,
    pub site_instant_power: Option<i64>,
    pub load_instant_power: Option<i64>,
    pub battery_instant_power: Option<i64>,
    pub solar_instant_power: Option<i64>,
    pub battery_charge: Option<f64>,
    pub query_time: Duration,
    pub pct_history: Vec<DayBatteryPct>,
    pub stats_history: Vec<DayPowerStats>,
}

impl SiteStats {
    pub fn from_reading(location: &str, reading: &EnergyReading) -> Self {
        Self {
            location: location.to_uppercase(),
            as_of: reading.as_of.with_timezone(&Local),
            site_instant_power: reading.site_power.map(|w| w as i64),
            load_instant_power: reading.load_power.map(|w| w as i64),
            battery_instant_power: reading.battery_power.map(|w| w as i64),
            solar_instant_power: reading.solar_power.map(|w| w as i64),
            battery_charge: reading.battery_percent,
            query_time: Duration::ZERO,
            pct_history: Vec::new(),
            stats_history: Vec::new(),
        }
    }
}

/// High, low and running total of one quantity over a day.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    pub high: f64,
    pub high_time: DateTime<Utc>,
    pub low: f64,
    pub low_time: DateTime<Utc>,
    pub num_samples: usize,
    pub total: f64,
}

impl ChannelStats {
    fn first(value: f64, time: DateTime<Utc>) -> Self {
        Self {
            high: value,
            high_time: time,
            low: value,
            low_time: time,
            num_samples: 1,
            total: value,
        }
    }

    fn add(&mut self, value: f64, time: DateTime<Utc>) {
        if value > self.high {
            self.high = value;
            self.high_time = time;
        }
        if value < self.low {
            self.low = value;
            self.low_time = time;
        }
        self.num_samples += 1;
        self.total += value;
    }

    fn record(slot: &mut Option<Self>, value: Option<f64>, time: DateTime<Utc>) {
        let Some(value) = value else {
            return;
        };
        match slot {
            Some(stats) => stats.add(value, time),
            None => *slot = Some(Self::first(value, time)),
        }
    }

    pub fn average(&self) -> f64 {
        self.total / self.num_samples as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayBatteryPct {
    pub day: NaiveDate,
    pub pct: ChannelStats,
}

/// A channel with no values that day is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPowerStats {
    pub day: NaiveDate,
    pub site: Option<ChannelStats>,
    pub load: Option<ChannelStats>,
    pub battery: Option<ChannelStats>,
    pub solar: Option<ChannelStats>,
}

/// Per-day battery percentage summaries in `tz`, newest day first.
pub fn summarize_battery_days<Tz: TimeZone>(samples: &[BatterySample], tz: &Tz) -> Vec<DayBatteryPct> {
    let mut days: BTreeMap<NaiveDate, Option<ChannelStats>> = BTreeMap::new();

    for sample in samples {
        let Some(time) = Utc.timestamp_millis_opt(sample.time_ms).single() else {
            continue;
        };
        let day = time.with_timezone(tz).date_naive();
        ChannelStats::record(days.entry(day).or_default(), Some(sample.percent), time);
    }

    days.into_iter()
        .rev()
        .filter_map(|(day, pct)| pct.map(|pct| DayBatteryPct { day, pct }))
        .collect()
}

/// Per-day site/load/battery/solar power summaries in `tz`, newest day first.
pub fn summarize_power_days<Tz: TimeZone>(readings: &[EnergyReading], tz: &Tz) -> Vec<DayPowerStats> {
    #[derive(Default)]
    struct Accumulator {
        site: Option<ChannelStats>,
        load: Option<ChannelStats>,
        battery: Option<ChannelStats>,
        solar: Option<ChannelStats>,
    }

    let mut days: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();

    for reading in readings {
        let day = reading.as_of.with_timezone(tz).date_naive();
        let acc = days.entry(day).or_default();
        ChannelStats::record(&mut acc.site, reading.site_power, reading.as_of);
        ChannelStats::record(&mut acc.load, reading.load_power, reading.as_of);
        ChannelStats::record(&mut acc.battery, reading.battery_power, reading.as_of);
        ChannelStats::record(&mut acc.solar, reading.solar_power, reading.as_of);
    }

    days.into_iter()
        .rev()
        .filter(|(_, acc)| {
            acc.site.is_some() || acc.load.is_some() || acc.battery.is_some() || acc.solar.is_some()
        })
        .map(|(day, acc)| DayPowerStats {
            day,
            site: acc.site,
            load: acc.load,
            battery: acc.battery,
            solar: acc.solar,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn reading(rfc3339: &str, site: f64, load: f64, battery: f64, solar: f64) -> EnergyReading {
        EnergyReading {
            as_of: at(rfc3339),
            battery_percent: Some(50.0),
            site_power: Some(site),
            load_power: Some(load),
            battery_power: Some(battery),
            solar_power: Some(solar),
        }
    }

    #[test]
    fn test_site_stats_from_reading() {
        let stats = SiteStats::from_reading("ma", &reading("2024-01-01T10:00:00Z", 12.9, -450.7, 3000.2, 0.0));

        assert_eq!(stats.location, "MA");
        assert_eq!(stats.site_instant_power, Some(12));
        assert_eq!(stats.load_instant_power, Some(-450));
        assert_eq!(stats.battery_instant_power, Some(3000));
        assert_eq!(stats.battery_charge, Some(50.0));
        assert_eq!(stats.as_of.with_timezone(&Utc), at("2024-01-01T10:00:00Z"));
    }

    #[test]
    fn test_battery_days_newest_first() {
        let samples = vec![
            BatterySample::new(at("2024-01-01T08:00:00Z").timestamp_millis(), 40.0),
            BatterySample::new(at("2024-01-01T12:00:00Z").timestamp_millis(), 90.0),
            BatterySample::new(at("2024-01-01T20:00:00Z").timestamp_millis(), 20.0),
            BatterySample::new(at("2024-01-02T09:00:00Z").timestamp_millis(), 70.0),
        ];

        let days = summarize_battery_days(&samples, &Utc);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(days[0].pct.num_samples, 1);

        let first = &days[1].pct;
        assert_eq!(first.high, 90.0);
        assert_eq!(first.high_time, at("2024-01-01T12:00:00Z"));
        assert_eq!(first.low, 20.0);
        assert_eq!(first.low_time, at("2024-01-01T20:00:00Z"));
        assert_eq!(first.num_samples, 3);
        assert_eq!(first.average(), 50.0);
    }

    #[test]
    fn test_battery_days_follow_local_calendar() {
        // 02:00 UTC is still the previous day five hours west
        let zone = FixedOffset::west_opt(5 * 3600).unwrap();
        let samples = vec![BatterySample::new(at("2024-01-02T02:00:00Z").timestamp_millis(), 55.0)];

        let days = summarize_battery_days(&samples, &zone);
        assert_eq!(days[0].day, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_power_days() {
        let readings = vec![
            reading("2024-01-01T08:00:00Z", 100.0, 800.0, -200.0, 0.0),
            reading("2024-01-01T13:00:00Z", -300.0, 600.0, 500.0, 4000.0),
        ];

        let days = summarize_power_days(&readings, &Utc);

        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.site.as_ref().unwrap().high, 100.0);
        assert_eq!(day.site.as_ref().unwrap().low, -300.0);
        assert_eq!(day.load.as_ref().unwrap().average(), 700.0);
        assert_eq!(day.solar.as_ref().unwrap().high_time, at("2024-01-01T13:00:00Z"));
        assert_eq!(day.battery.as_ref().unwrap().num_samples, 2);
    }

    #[test]
    fn test_missing_fields_are_not_counted() {
        let mut partial = reading("2024-01-01T09:00:00Z", 0.0, 0.0, 0.0, 0.0);
        partial.battery_percent = None;
        partial.solar_power = None;
        partial.site_power = None;
        let readings = vec![
            reading("2024-01-01T08:00:00Z", 100.0, 800.0, -200.0, 1500.0),
            partial.clone(),
        ];

        let days = summarize_power_days(&readings, &Utc);
        assert_eq!(days[0].solar.as_ref().unwrap().num_samples, 1);
        assert_eq!(days[0].solar.as_ref().unwrap().low, 1500.0);
        assert_eq!(days[0].load.as_ref().unwrap().num_samples, 2);

        let samples: Vec<BatterySample> = readings.iter().filter_map(EnergyReading::battery_sample).collect();
        assert_eq!(samples.len(), 1);

        let stats = SiteStats::from_reading("ma", &partial);
        assert_eq!(stats.battery_charge, None);
        assert_eq!(stats.solar_instant_power, None);
        assert_eq!(stats.load_instant_power, Some(0));
    }

    #[test]
    fn test_day_without_any_power_is_skipped() {
        let mut empty = reading("2024-01-03T09:00:00Z", 0.0, 0.0, 0.0, 0.0);
        empty.site_power = None;
        empty.load_power = None;
        empty.battery_power = None;
        empty.solar_power = None;

        assert!(summarize_power_days(&[empty], &Utc).is_empty());
    }

    #[test]
    fn test_no_samples_no_days() {
        assert!(summarize_battery_days(&[], &Utc).is_empty());
        assert!(summarize_power_days(&[], &Utc).is_empty());
    }
}
