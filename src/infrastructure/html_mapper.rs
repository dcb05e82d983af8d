// Mapper to convert domain models to HTML fragments
use crate::domain::energy::{ChannelStats, DayBatteryPct, DayPowerStats, SiteStats};
use chrono::{DateTime, Local, Utc};
use html_escape::{encode_double_quoted_attribute, encode_safe};

const MISSING: &str = "&ndash;";

fn local_hm(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%H:%M").to_string()
}

fn watts(value: Option<i64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |w| w.to_string())
}

pub fn sites_to_html(sites: &[SiteStats]) -> String {
    sites.iter().map(site_to_html).collect::<Vec<_>>().join("\n")
}

pub fn site_to_html(site: &SiteStats) -> String {
    let href = format!("/battery/{}", urlencoding::encode(&site.location.to_lowercase()));
    let charge = site
        .battery_charge
        .map_or_else(|| MISSING.to_string(), |pct| format!("{:.1}%", pct));

    let mut html = format!(
        "<section class=\"site\">\n\
         <h2><a href=\"{}\">{}</a></h2>\n\
         <p>As of {} ({} ms)</p>\n\
         <table>\n\
         <tr><th>Battery</th><th>Site</th><th>Load</th><th>Battery W</th><th>Solar</th></tr>\n\
         <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n\
         </table>\n",
        encode_double_quoted_attribute(&href),
        encode_safe(&site.location),
        site.as_of.format("%Y-%m-%d %H:%M:%S"),
        site.query_time.as_millis(),
        charge,
        watts(site.site_instant_power),
        watts(site.load_instant_power),
        watts(site.battery_instant_power),
        watts(site.solar_instant_power),
    );

    if !site.pct_history.is_empty() {
        html.push_str("<table class=\"pct-history\">\n");
        html.push_str("<tr><th>Date</th><th>High</th><th>Low</th><th>Average</th><th>Samples</th></tr>\n");
        for day in &site.pct_history {
            html.push_str(&pct_row(day));
        }
        html.push_str("</table>\n");
    }

    if !site.stats_history.is_empty() {
        html.push_str("<table class=\"stats-history\">\n");
        html.push_str("<tr><th>Date</th><th>Site</th><th>Load</th><th>Battery</th><th>Solar</th></tr>\n");
        for day in &site.stats_history {
            html.push_str(&stats_row(day));
        }
        html.push_str("</table>\n");
    }

    html.push_str("</section>\n");
    html
}

fn pct_row(day: &DayBatteryPct) -> String {
    format!(
        "<tr><td>{}</td><td>{:.1}% @ {}</td><td>{:.1}% @ {}</td><td>{:.1}%</td><td>{}</td></tr>\n",
        day.day.format("%Y-%m-%d"),
        day.pct.high,
        local_hm(&day.pct.high_time),
        day.pct.low,
        local_hm(&day.pct.low_time),
        day.pct.average(),
        day.pct.num_samples
    )
}

fn channel_cell(stats: Option<&ChannelStats>) -> String {
    let Some(stats) = stats else {
        return MISSING.to_string();
    };
    format!(
        "{:.0} / {:.0} / {:.0} W<br>{} &ndash; {}",
        stats.high,
        stats.average(),
        stats.low,
        local_hm(&stats.high_time),
        local_hm(&stats.low_time)
    )
}

fn stats_row(day: &DayPowerStats) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        day.day.format("%Y-%m-%d"),
        channel_cell(day.site.as_ref()),
        channel_cell(day.load.as_ref()),
        channel_cell(day.battery.as_ref()),
        channel_cell(day.solar.as_ref())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::battery::BatterySample;
    use crate::domain::energy::{summarize_battery_days, summarize_power_days, EnergyReading};
    use chrono::TimeZone;

    fn reading() -> EnergyReading {
        EnergyReading {
            as_of: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            battery_percent: Some(87.54),
            site_power: Some(5.0),
            load_power: Some(950.0),
            battery_power: Some(-400.0),
            solar_power: Some(1345.0),
        }
    }

    #[test]
    fn test_site_without_history() {
        let html = site_to_html(&SiteStats::from_reading("m<a>", &reading()));

        assert!(html.contains("M&lt;A&gt;"));
        assert!(!html.contains("<A>"));
        assert!(html.contains("<td>87.5%</td><td>5</td><td>950</td><td>-400</td><td>1345</td>"));
        assert!(!html.contains("pct-history"));
        assert!(!html.contains("stats-history"));
    }

    #[test]
    fn test_href_cannot_break_out_of_attribute() {
        let html = site_to_html(&SiteStats::from_reading("x\" onclick=\"y", &reading()));

        assert!(!html.contains("\" onclick"));
        assert!(html.contains("<a href=\"/battery/x%22%20onclick%3D%22y\">"));
    }

    #[test]
    fn test_missing_values_render_as_dash() {
        let mut partial = reading();
        partial.battery_percent = None;
        partial.solar_power = None;
        let mut stats = SiteStats::from_reading("ma", &partial);
        stats.stats_history = summarize_power_days(&[partial], &Local);

        let html = site_to_html(&stats);
        assert!(html.contains("<td>&ndash;</td><td>5</td><td>950</td><td>-400</td><td>&ndash;</td>"));
        assert!(html.contains("stats-history"));
        assert!(html.ends_with("<td>&ndash;</td></tr>\n</table>\n</section>\n"));
    }

    #[test]
    fn test_site_with_pct_history() {
        let mut stats = SiteStats::from_reading("ma", &reading());
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap().timestamp_millis();
        stats.pct_history = summarize_battery_days(
            &[BatterySample::new(t, 80.0), BatterySample::new(t + 60_000, 90.0)],
            &Local,
        );

        let html = sites_to_html(&[stats]);
        assert!(html.contains("pct-history"));
        assert!(html.contains("<td>85.0%</td><td>2</td>"));
    }
}
