// Request-path errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no last row for topic {topic}")]
    NoData { topic: String },

    #[error("repository error: {0:#}")]
    Repository(#[from] anyhow::Error),

    #[error("render error: {0}")]
    Render(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Telemetry topic a location publishes to.
pub fn topic_for(location: &str) -> String {
    format!("energy/{}/energy", location)
}
