//! Plain-text formatting for terminal output.

use chrono::NaiveDateTime;
use yr_core::{
    ForecastEntry, Language, WeatherReport, config::format_timestamp, group_by_day,
    render::day_label, translate,
};

pub fn info(report: &WeatherReport, date_format: &str) -> yr_core::Result<String> {
    let loc = &report.location;
    let sun_time = |t: Option<NaiveDateTime>| match t {
        Some(t) => format_timestamp(t, date_format),
        None => Ok("-".to_string()),
    };

    let lines = [
        format!("{} ({}), {}", loc.name, loc.kind, loc.country),
        format!(
            "Timezone: {} (UTC{:+})",
            loc.timezone.id,
            loc.timezone.utc_offset_minutes as f64 / 60.0
        ),
        format!(
            "Position: {}, {} ({} m.a.s.l., {} {})",
            loc.coordinates.latitude,
            loc.coordinates.longitude,
            loc.coordinates.altitude,
            loc.coordinates.geobase,
            loc.coordinates.geobase_id
        ),
        format!("Sunrise:  {}", sun_time(report.sun.rise)?),
        format!("Sunset:   {}", sun_time(report.sun.set)?),
    ];

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

pub fn forecast(entries: &[ForecastEntry], language: Language) -> String {
    let today = chrono::Local::now().date_naive();

    let mut out = String::new();
    for group in group_by_day(entries) {
        out.push_str(&format!(
            "{}, {}\n",
            day_label(group.date, today, language),
            group.date.format("%d.%m.%Y")
        ));
        for e in group.entries {
            out.push_str(&format!(
                "  {}-{}  {:<20} {:>6.1}°C  {:>5.1} mm  {}, {} {} {} {}\n",
                e.from.format("%H:%M"),
                e.to.format("%H:%M"),
                e.symbol.name,
                e.temperature_c,
                e.precipitation_mm,
                e.wind_speed_name,
                e.wind_speed_mps,
                translate("m/s", language),
                translate("from", language),
                e.wind_direction.name.to_lowercase()
            ));
        }
    }
    out
}
