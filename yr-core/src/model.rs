use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Period index yr.no uses for the 12:00-18:00 interval.
pub const MIDDAY_PERIOD: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timezone {
    pub id: String,
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub altitude: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub geobase: String,
    pub geobase_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    /// e.g. "By", "Tettsted".
    pub kind: String,
    pub country: String,
    pub timezone: Timezone,
    pub coordinates: Coordinates,
}

/// Sunrise and sunset in the location's local time.
///
/// Either may be absent during polar day or night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sun {
    pub rise: Option<NaiveDateTime>,
    pub set: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub number: u32,
    pub name: String,
    pub var: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindDirection {
    pub deg: f64,
    pub code: String,
    pub name: String,
}

/// One `<time>` record of the tabular forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub period: u8,
    /// 0 = Sunday, 6 = Saturday.
    pub weekday_index: u32,
    /// English weekday name, e.g. "Monday".
    pub weekday_name: String,
    pub symbol: Symbol,
    pub precipitation_mm: f64,
    pub wind_direction: WindDirection,
    pub wind_speed_mps: f64,
    /// e.g. "Lett bris".
    pub wind_speed_name: String,
    pub temperature_c: f64,
    pub temperature_unit: String,
    pub pressure_value: f64,
    pub pressure_unit: String,
}

impl ForecastEntry {
    /// Calendar date of the interval start.
    pub fn date(&self) -> NaiveDate {
        self.from.date()
    }

    pub fn is_midday(&self) -> bool {
        self.period == MIDDAY_PERIOD
    }
}

/// Everything read from one forecast document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: LocationInfo,
    pub sun: Sun,
    pub forecast: Vec<ForecastEntry>,
}

impl WeatherReport {
    /// The first three midday (period 2) entries, or fewer if the document
    /// has fewer.
    pub fn next_three_middays(&self) -> Vec<ForecastEntry> {
        next_three_middays(&self.forecast)
    }
}

pub fn next_three_middays(entries: &[ForecastEntry]) -> Vec<ForecastEntry> {
    entries.iter().filter(|e| e.is_midday()).take(3).cloned().collect()
}
