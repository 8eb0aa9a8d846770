//! Day grouping and HTML table rendering of a forecast.

use askama::Template;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{error::Result, i18n::translate, location::Language, model::ForecastEntry};

pub const DEFAULT_HEADER_BACKGROUND: &str = "#016B6D";
pub const DEFAULT_HEADER_TEXT_COLOR: &str = "#ffffff";

/// Styling options for [`render_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    /// Emit a `<style>` block before the tables.
    pub include_default_style: bool,
    pub header_background: String,
    pub header_text_color: String,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            include_default_style: true,
            header_background: DEFAULT_HEADER_BACKGROUND.to_string(),
            header_text_color: DEFAULT_HEADER_TEXT_COLOR.to_string(),
        }
    }
}

/// A contiguous run of entries starting on the same calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub date: NaiveDate,
    pub entries: &'a [ForecastEntry],
}

/// Split `entries` into runs of consecutive entries sharing a date.
///
/// Entries are not re-sorted; a date that reappears after a different date
/// starts a new group.
pub fn group_by_day(entries: &[ForecastEntry]) -> Vec<DayGroup<'_>> {
    entries
        .chunk_by(|a, b| a.date() == b.date())
        .map(|run| DayGroup {
            date: run[0].date(),
            entries: run,
        })
        .collect()
}

/// "Today" / "Tomorrow" / weekday name for `date`, translated.
pub fn day_label(date: NaiveDate, today: NaiveDate, language: Language) -> String {
    let key = if date == today {
        "Today".to_string()
    } else if today.checked_add_days(Days::new(1)) == Some(date) {
        "Tomorrow".to_string()
    } else {
        date.format("%A").to_string()
    };

    translate(&key, language).to_string()
}

/// Render `entries` as one HTML table per day group.
///
/// `today` decides which caption reads "Today" and "Tomorrow". Row parity
/// runs across the whole output rather than restarting for each table.
pub fn render_table(
    entries: &[ForecastEntry],
    language: Language,
    style: &TableStyle,
    today: NaiveDate,
) -> Result<String> {
    let mut html: Vec<String> = Vec::new();

    if style.include_default_style {
        let block = StyleBlock {
            header_background: &style.header_background,
            header_text_color: &style.header_text_color,
        };
        html.push(block.render()?);
    }

    let headings = Headings::new(language);
    let mut offset = 0;
    for group in group_by_day(entries) {
        let rows = group
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| RowView::new(entry, offset + i, language))
            .collect();
        offset += group.entries.len();

        let table = DayTable {
            label: day_label(group.date, today, language),
            date: group.date.format("%d.%m.%Y").to_string(),
            headings: &headings,
            rows,
        };
        html.push(table.render()?);
    }

    Ok(html.join("\n"))
}

// ============================================================================
// Templates
// ============================================================================

/// `<style>` block for the weather tables.
#[derive(Template)]
#[template(path = "table_style.html")]
struct StyleBlock<'a> {
    header_background: &'a str,
    header_text_color: &'a str,
}

/// One `<table>` for a single day.
#[derive(Template)]
#[template(path = "day_table.html")]
struct DayTable<'a> {
    label: String,
    date: String,
    headings: &'a Headings,
    rows: Vec<RowView<'a>>,
}

// ============================================================================
// View Models
// ============================================================================

struct Headings {
    time: &'static str,
    forecast: &'static str,
    temp: &'static str,
    precipitation: &'static str,
    wind: &'static str,
}

impl Headings {
    fn new(language: Language) -> Self {
        Self {
            time: translate("Time", language),
            forecast: translate("Forecast", language),
            temp: translate("Temp.", language),
            precipitation: translate("Precipitation", language),
            wind: translate("Wind", language),
        }
    }
}

struct RowView<'a> {
    parity: &'static str,
    from: String,
    to: String,
    symbol: &'a str,
    sign: &'static str,
    temperature: f64,
    precipitation: f64,
    wind: String,
}

impl<'a> RowView<'a> {
    fn new(entry: &'a ForecastEntry, index: usize, language: Language) -> Self {
        let wind = format!(
            "{}, {} {} {} {}",
            entry.wind_speed_name,
            entry.wind_speed_mps,
            translate("m/s", language),
            translate("from", language),
            entry.wind_direction.name.to_lowercase()
        );

        Self {
            parity: if index % 2 == 0 { "odd" } else { "even" },
            from: entry.from.format("%H:%M").to_string(),
            to: entry.to.format("%H:%M").to_string(),
            symbol: &entry.symbol.name,
            // Zero gets the "minus" styling.
            sign: if entry.temperature_c > 0.0 { "plus" } else { "minus" },
            temperature: entry.temperature_c,
            precipitation: entry.precipitation_mm,
            wind,
        }
    }
}
