// Page templates with `{{.Name}}` placeholder substitution
use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PageTemplates {
    pub index: String,
    pub dashboard: String,
    pub battery: String,
    pub battery_chart: String,
}

impl PageTemplates {
    /// Load every template from `dir`. A missing file is a start-up error.
    pub fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template {}", path.display()))
        };

        Ok(Self {
            index: read("index.html")?,
            dashboard: read("dashboard.html")?,
            battery: read("battery.html")?,
            battery_chart: read("battery_chart.js")?,
        })
    }
}

/// Replace each `{{.Key}}` with its value. Unknown placeholders are left as-is.
pub fn render(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("{{{{.{}}}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let mut vars = HashMap::new();
        vars.insert("Service", "energy".to_string());
        vars.insert("Revision", "1.0".to_string());

        let out = render("<h1>{{.Service}}</h1><p>{{.Revision}} {{.Service}}</p>", &vars);
        assert_eq!(out, "<h1>energy</h1><p>1.0 energy</p>");
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let out = render("data: {{.BatteryGraphData}}", &HashMap::new());
        assert_eq!(out, "data: {{.BatteryGraphData}}");
    }

    #[test]
    fn test_load_shipped_templates() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        let templates = PageTemplates::load(dir).unwrap();

        assert!(templates.battery_chart.contains("DOMContentLoaded"));
        assert!(templates.battery_chart.contains("{{.ChartOptions}}"));
        assert!(templates.battery.contains("{{.MountPoint}}"));
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let err = PageTemplates::load("/nonexistent/templates").unwrap_err();
        assert!(err.to_string().contains("index.html"));
    }
}
