// InfluxDB repository implementation
use crate::application::energy_repository::EnergyRepository;
use crate::application::error::topic_for;
use crate::domain::battery::BatterySample;
use crate::domain::energy::EnergyReading;
use crate::infrastructure::config::{prepare_query, quote_literal, InfluxSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

const READING_FIELDS: &str = "battery_percent_full, site_instant_power, load_instant_power, battery_instant_power, solar_instant_power";

const LATEST_QUERY: &str =
    "SELECT ${fields} FROM \"${measurement}\" WHERE topic = '${topic}' ORDER BY time DESC LIMIT 1";

const READINGS_QUERY: &str =
    "SELECT ${fields} FROM \"${measurement}\" WHERE topic = '${topic}' AND time >= now() - ${hours}h ORDER BY time ASC";

const BATTERY_QUERY: &str =
    "SELECT battery_percent_full AS value FROM \"${measurement}\" WHERE topic = '${topic}' AND time >= now() - ${hours}h ORDER BY time ASC";

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    host: String,
    token: String,
    database: String,
    retention_policy: String,
    measurement: String,
    max_points: usize,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    columns: Vec<String>,
    values: Vec<Vec<serde_json::Value>>,
}

impl InfluxQLSeries {
    fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

impl InfluxRepository {
    pub fn new(settings: InfluxSettings) -> Self {
        Self {
            host: settings.host.trim_end_matches('/').to_string(),
            token: settings.token,
            database: settings.database,
            retention_policy: settings.retention_policy,
            measurement: settings.measurement,
            max_points: settings.max_points,
            client: reqwest::Client::new(),
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!(
            "{}/query?db={}&rp={}&epoch=ms&q={}",
            self.host, self.database, self.retention_policy, encoded_query
        )
    }

    fn query_for(&self, template: &str, location: &str, hours: Option<i32>) -> String {
        let mut vars = HashMap::new();
        vars.insert("fields".to_string(), READING_FIELDS.to_string());
        vars.insert("measurement".to_string(), self.measurement.replace('"', "\\\""));
        vars.insert("topic".to_string(), quote_literal(&topic_for(location)));
        if let Some(hours) = hours {
            vars.insert("hours".to_string(), hours.max(1).to_string());
        }
        prepare_query(template, &vars)
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        let url = self.build_query_url(query);
        tracing::debug!("Executing InfluxQL query: {}", query);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if !self.token.is_empty() {
            request = request.header("Authorization", format!("Token {}", self.token));
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<InfluxQLResponse>()
            .await
            .context("Failed to parse InfluxDB response")?;

        // Check for errors in the response
        if let Some(result) = data.results.first() {
            if let Some(error) = &result.error {
                anyhow::bail!("InfluxDB query error: {}", error);
            }
        }

        Ok(data)
    }

    fn parse_readings(response: &InfluxQLResponse) -> Vec<EnergyReading> {
        let mut readings = Vec::new();
        let Some(series) = response.results.first().and_then(|r| r.series.as_ref()) else {
            return readings;
        };

        for s in series {
            let (Some(time), Some(pct), Some(site), Some(load), Some(battery), Some(solar)) = (
                s.column("time"),
                s.column("battery_percent_full"),
                s.column("site_instant_power"),
                s.column("load_instant_power"),
                s.column("battery_instant_power"),
                s.column("solar_instant_power"),
            ) else {
                tracing::warn!("Unexpected columns in energy series: {:?}", s.columns);
                continue;
            };

            for row in &s.values {
                let Some(as_of) = row.get(time).and_then(parse_time) else {
                    continue;
                };
                // A null field stays unknown rather than reading as zero
                let field = |idx: usize| row.get(idx).and_then(|v| v.as_f64());
                readings.push(EnergyReading {
                    as_of,
                    battery_percent: field(pct),
                    site_power: field(site),
                    load_power: field(load),
                    battery_power: field(battery),
                    solar_power: field(solar),
                });
            }
        }

        readings
    }

    fn parse_samples(response: &InfluxQLResponse) -> Vec<BatterySample> {
        let mut points = Vec::new();
        let Some(series) = response.results.first().and_then(|r| r.series.as_ref()) else {
            return points;
        };

        for s in series {
            let time_idx = s.column("time").unwrap_or(0);
            let value_idx = s.column("value").unwrap_or(1);

            for row in &s.values {
                if let (Some(time), Some(value)) = (
                    row.get(time_idx).and_then(parse_time),
                    row.get(value_idx).and_then(|v| v.as_f64()),
                ) {
                    points.push(BatterySample::new(time.timestamp_millis(), value));
                }
            }
        }

        points
    }

    /// Downsample time series points using bucket averaging
    fn downsample_points(points: Vec<BatterySample>, max_points: usize) -> Vec<BatterySample> {
        if points.is_empty() || max_points == 0 || points.len() <= max_points {
            return points;
        }

        let bucket_size = (points.len() as f64 / max_points as f64).ceil() as usize;
        let mut downsampled = Vec::with_capacity(max_points);

        for chunk in points.chunks(bucket_size) {
            // Use middle point's timestamp and average value
            let mid_idx = chunk.len() / 2;
            let avg_value = chunk.iter().map(|p| p.percent).sum::<f64>() / chunk.len() as f64;

            downsampled.push(BatterySample::new(chunk[mid_idx].time_ms, avg_value));
        }

        downsampled
    }
}

/// Timestamps arrive as epoch milliseconds (`epoch=ms`) or RFC 3339 strings.
fn parse_time(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    if let Some(ms) = value.as_i64() {
        return DateTime::from_timestamp_millis(ms);
    }
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

#[async_trait]
impl EnergyRepository for InfluxRepository {
    async fn latest_reading(&self, location: &str) -> Result<Option<EnergyReading>> {
        let query = self.query_for(LATEST_QUERY, location, None);
        let response = self.execute_query(&query).await?;
        Ok(Self::parse_readings(&response).into_iter().next())
    }

    async fn battery_history(&self, location: &str, hours: i32) -> Result<Vec<BatterySample>> {
        let query = self.query_for(BATTERY_QUERY, location, Some(hours));
        let response = self.execute_query(&query).await?;
        let points = Self::parse_samples(&response);

        tracing::debug!("Got {} battery samples for {}", points.len(), location);
        Ok(Self::downsample_points(points, self.max_points))
    }

    async fn readings(&self, location: &str, hours: i32) -> Result<Vec<EnergyReading>> {
        let query = self.query_for(READINGS_QUERY, location, Some(hours));
        let response = self.execute_query(&query).await?;
        Ok(Self::parse_readings(&response))
    }
}
