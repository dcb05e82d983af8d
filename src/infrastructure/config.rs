use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub influx: InfluxSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub service: String,
    pub revision: String,
    pub templates_dir: String,
    pub assets_dir: String,
    #[serde(default)]
    pub locations: Vec<String>,
    pub history_hours: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub host: String,
    pub token: String,
    pub database: String,
    pub retention_policy: String,
    pub measurement: String,
    pub max_points: usize,
}

/// Load configuration from `path` (file stem, any format the config crate knows),
/// then `DASHBOARD__SECTION__KEY` environment variables, then `PORT`.
pub fn load_config(path: &str) -> anyhow::Result<AppConfig> {
    build_config(path, None, std::env::var("PORT").ok())
}

/// `env` replaces the process environment when set.
fn build_config(
    path: &str,
    env: Option<config::Map<String, String>>,
    port: Option<String>,
) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.service", "energy dashboard")?
        .set_default("server.revision", env!("CARGO_PKG_VERSION"))?
        .set_default("server.templates_dir", "templates")?
        .set_default("server.assets_dir", "assets")?
        .set_default("server.history_hours", 72)?
        .set_default("influx.retention_policy", "autogen")?
        .set_default("influx.measurement", "energy")?
        .set_default("influx.max_points", 500)?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.locations")
                .source(env),
        )
        .set_override_option("server.port", port)?
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` variables in a query string
pub fn prepare_query(query: &str, vars: &HashMap<String, String>) -> String {
    let mut result = query.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

/// Escape a value for use inside a single-quoted InfluxQL string literal
pub fn quote_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
