// Chart configuration domain models
//
// Field names follow the charting library's option keys, so the serialized
// form can be handed to the browser runtime as-is.
use super::battery::{BatterySample, BatterySeries};
use chrono::{TimeZone, Utc};
use serde::Serialize;

pub const BATTERY_MOUNT_POINT: &str = "battPct";
pub const BATTERY_SERIES_NAME: &str = "Level";
pub const PERCENT_AXIS_MAX: f64 = 100.0;

const TOOLTIP_HEADER_FORMAT: &str = "<b>{series.name}</b><br>";
const TOOLTIP_POINT_FORMAT: &str = "{point.x:%H:%M}: {point.y:.2f}%";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Linear,
    Datetime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub zoom_type: String,
    pub panning: bool,
    pub pan_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisOptions {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl AxisOptions {
    /// Value as drawn on this axis; anything past `max` is clipped, never dropped.
    pub fn displayed(&self, value: f64) -> f64 {
        match self.max {
            Some(max) => value.min(max),
            None => value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOptions {
    pub header_format: String,
    pub point_format: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOptions {
    #[serde(rename = "useUTC")]
    pub use_utc: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesOptions {
    pub name: String,
    pub data: BatterySeries,
}

/// Declarative description of a single-series line chart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub chart: ChartSettings,
    pub title: Title,
    pub x_axis: AxisOptions,
    pub y_axis: AxisOptions,
    pub tooltip: TooltipOptions,
    pub time: TimeOptions,
    pub series: Vec<SeriesOptions>,
}

impl ChartOptions {
    /// Battery level over time: zoomable on x (pan with shift held), local time,
    /// percent axis capped at 100, one series named "Level".
    pub fn battery_level(series: &BatterySeries) -> Self {
        Self {
            chart: ChartSettings {
                kind: ChartKind::Line,
                zoom_type: "x".to_string(),
                panning: true,
                pan_key: "shift".to_string(),
            },
            title: Title::new("Battery Level"),
            x_axis: AxisOptions {
                kind: AxisKind::Datetime,
                title: Title::new("Date"),
                max: None,
            },
            y_axis: AxisOptions {
                kind: AxisKind::Linear,
                title: Title::new("%"),
                max: Some(PERCENT_AXIS_MAX),
            },
            tooltip: TooltipOptions {
                header_format: TOOLTIP_HEADER_FORMAT.to_string(),
                point_format: TOOLTIP_POINT_FORMAT.to_string(),
            },
            time: TimeOptions { use_utc: false },
            series: vec![SeriesOptions {
                name: BATTERY_SERIES_NAME.to_string(),
                data: series.clone(),
            }],
        }
    }

    /// JSON literal safe to embed inside a `<script>` element.
    pub fn to_json(&self) -> anyhow::Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(json.replace("</", "<\\/"))
    }
}

/// Server-side rendition of the chart tooltip.
#[derive(Debug, Clone)]
pub struct TooltipFormatter<Tz: TimeZone> {
    tz: Tz,
}

impl<Tz: TimeZone> TooltipFormatter<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn header(&self, series_name: &str) -> String {
        TOOLTIP_HEADER_FORMAT.replace("{series.name}", series_name)
    }

    pub fn point(&self, sample: &BatterySample) -> String {
        let time = match Utc.timestamp_millis_opt(sample.time_ms).single() {
            Some(t) => t.with_timezone(&self.tz).format("%H:%M").to_string(),
            None => "--:--".to_string(),
        };
        format!("{}: {:.2}%", time, round_half_away(sample.percent, 2))
    }
}

/// Round ties away from zero, as the browser's number formatting does.
/// `format!("{:.2}")` alone rounds exact ties to even.
fn round_half_away(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
