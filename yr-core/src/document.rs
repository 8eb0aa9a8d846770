//! Validation and parsing of yr.no `varsel.xml` documents.
//!
//! Numeric fields are parsed strictly: a value that does not parse as the
//! expected type fails the whole document with
//! [`YrError::MalformedDocument`].

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDateTime};
use roxmltree::{Document, Node};

use crate::{
    error::{Result, YrError},
    model::{
        Coordinates, ForecastEntry, LocationInfo, Sun, Symbol, Timezone, WeatherReport,
        WindDirection,
    },
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn as_text(bytes: &[u8]) -> std::result::Result<&str, String> {
    std::str::from_utf8(bytes).map_err(|e| format!("not valid UTF-8: {e}"))
}

/// Check that `bytes` is a well-formed XML document.
pub fn validate(url: &str, bytes: &[u8]) -> Result<()> {
    let invalid = |message: String| YrError::InvalidDocument {
        url: url.to_string(),
        message,
    };

    let text = as_text(bytes).map_err(invalid)?;
    Document::parse(text).map_err(|e| invalid(e.to_string()))?;
    Ok(())
}

/// Parse a validated document into a [`WeatherReport`].
pub fn parse_report(bytes: &[u8]) -> Result<WeatherReport> {
    let text = as_text(bytes).map_err(YrError::MalformedDocument)?;
    let doc = Document::parse(text).map_err(|e| YrError::malformed(e.to_string()))?;
    let root = doc.root_element();

    if !root.has_tag_name("weatherdata") {
        return Err(YrError::malformed(format!(
            "expected <weatherdata> root, found <{}>",
            root.tag_name().name()
        )));
    }

    Ok(WeatherReport {
        location: parse_location(child(root, "location")?)?,
        sun: parse_sun(child(root, "sun")?)?,
        forecast: parse_forecast(root)?,
    })
}

/// Parse only the tabular forecast of a document.
pub fn parse_forecast_entries(bytes: &[u8]) -> Result<Vec<ForecastEntry>> {
    let text = as_text(bytes).map_err(YrError::MalformedDocument)?;
    let doc = Document::parse(text).map_err(|e| YrError::malformed(e.to_string()))?;
    parse_forecast(doc.root_element())
}

fn parse_location(node: Node<'_, '_>) -> Result<LocationInfo> {
    let tz = child(node, "timezone")?;
    let coords = child(node, "location")?;

    Ok(LocationInfo {
        name: text(child(node, "name")?),
        kind: text(child(node, "type")?),
        country: text(child(node, "country")?),
        timezone: Timezone {
            id: attr(tz, "id")?.to_string(),
            utc_offset_minutes: number(tz, "utcoffsetMinutes")?,
        },
        coordinates: Coordinates {
            altitude: number(coords, "altitude")?,
            latitude: number(coords, "latitude")?,
            longitude: number(coords, "longitude")?,
            geobase: attr(coords, "geobase")?.to_string(),
            geobase_id: attr(coords, "geobaseid")?.to_string(),
        },
    })
}

fn parse_sun(node: Node<'_, '_>) -> Result<Sun> {
    let optional_time = |name: &str| {
        node.attribute(name)
            .map(|raw| timestamp(raw).ok_or_else(|| bad_value(node, name, raw)))
            .transpose()
    };

    Ok(Sun {
        rise: optional_time("rise")?,
        set: optional_time("set")?,
    })
}

fn parse_forecast(root: Node<'_, '_>) -> Result<Vec<ForecastEntry>> {
    let tabular = child(child(root, "forecast")?, "tabular")?;

    tabular
        .children()
        .filter(|n| n.has_tag_name("time"))
        .map(parse_time)
        .collect()
}

fn parse_time(node: Node<'_, '_>) -> Result<ForecastEntry> {
    let from = time_attr(node, "from")?;
    let to = time_attr(node, "to")?;

    let symbol = child(node, "symbol")?;
    let wind_direction = child(node, "windDirection")?;
    let wind_speed = child(node, "windSpeed")?;
    let temperature = child(node, "temperature")?;
    let pressure = child(node, "pressure")?;

    Ok(ForecastEntry {
        from,
        to,
        period: number(node, "period")?,
        weekday_index: from.weekday().num_days_from_sunday(),
        weekday_name: from.format("%A").to_string(),
        symbol: Symbol {
            number: number(symbol, "number")?,
            name: attr(symbol, "name")?.to_string(),
            var: symbol.attribute("var").unwrap_or_default().to_string(),
        },
        precipitation_mm: number(child(node, "precipitation")?, "value")?,
        wind_direction: WindDirection {
            deg: number(wind_direction, "deg")?,
            code: attr(wind_direction, "code")?.to_string(),
            name: attr(wind_direction, "name")?.to_string(),
        },
        wind_speed_mps: number(wind_speed, "mps")?,
        wind_speed_name: attr(wind_speed, "name")?.to_string(),
        temperature_c: number(temperature, "value")?,
        temperature_unit: attr(temperature, "unit")?.to_string(),
        pressure_value: number(pressure, "value")?,
        pressure_unit: attr(pressure, "unit")?.to_string(),
    })
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Result<Node<'a, 'i>> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .ok_or_else(|| {
            YrError::malformed(format!("<{}> has no <{name}> element", node.tag_name().name()))
        })
}

fn text(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().trim().to_string()
}

fn attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        YrError::malformed(format!("<{}> is missing attribute '{name}'", node.tag_name().name()))
    })
}

fn number<T: FromStr>(node: Node<'_, '_>, name: &str) -> Result<T> {
    let raw = attr(node, name)?;
    raw.trim().parse().map_err(|_| bad_value(node, name, raw))
}

fn time_attr(node: Node<'_, '_>, name: &str) -> Result<NaiveDateTime> {
    let raw = attr(node, name)?;
    timestamp(raw).ok_or_else(|| bad_value(node, name, raw))
}

/// yr.no timestamps are local wall-clock times without an offset. Offsets,
/// when present, are dropped so the wall-clock value is kept.
fn timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

fn bad_value(node: Node<'_, '_>, name: &str, raw: &str) -> YrError {
    YrError::malformed(format!(
        "<{}> attribute '{name}' has invalid value '{raw}'",
        node.tag_name().name()
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn time_record(from: &str, to: &str, period: u8, temp: &str) -> String {
        format!(
            r#"<time from="{from}" to="{to}" period="{period}">
        <symbol number="3" numberEx="3" name="Delvis skyet" var="03d" />
        <precipitation value="0.4" />
        <windDirection deg="190.3" code="S" name="Sør" />
        <windSpeed mps="3.4" name="Lett bris" />
        <temperature unit="celsius" value="{temp}" />
        <pressure unit="hPa" value="1018.3" />
      </time>"#
        )
    }

    pub(crate) fn document(times: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<weatherdata>
  <location>
    <name>Halden</name>
    <type>By</type>
    <country>Norge</country>
    <timezone id="Europe/Oslo" utcoffsetMinutes="120" />
    <location altitude="7" latitude="59.1245978642888" longitude="11.3873828303074" geobase="ssr" geobaseid="34643" />
  </location>
  <sun rise="2012-05-10T04:53:22" set="2012-05-10T21:39:40" />
  <forecast>
    <tabular>
      {}
    </tabular>
  </forecast>
</weatherdata>"#,
            times.join("\n      ")
        )
    }

    /// Eight six-hour records over 10 and 11 May 2012, two of them midday.
    pub(crate) fn two_day_document() -> String {
        document(&[
            time_record("2012-05-10T00:00:00", "2012-05-10T06:00:00", 0, "4"),
            time_record("2012-05-10T06:00:00", "2012-05-10T12:00:00", 1, "9"),
            time_record("2012-05-10T12:00:00", "2012-05-10T18:00:00", 2, "15"),
            time_record("2012-05-10T18:00:00", "2012-05-11T00:00:00", 3, "10"),
            time_record("2012-05-11T00:00:00", "2012-05-11T06:00:00", 0, "-1.5"),
            time_record("2012-05-11T06:00:00", "2012-05-11T12:00:00", 1, "0"),
            time_record("2012-05-11T12:00:00", "2012-05-11T18:00:00", 2, "12"),
            time_record("2012-05-11T18:00:00", "2012-05-12T00:00:00", 3, "7"),
        ])
    }

    #[test]
    fn validate_accepts_well_formed_xml() {
        assert!(validate("u", two_day_document().as_bytes()).is_ok());
    }

    #[test]
    fn validate_rejects_broken_xml() {
        for bad in [&b"<weatherdata><location>"[..], b"not xml at all", b"", b"\xff\xfe<a/>"] {
            let err = validate("http://x", bad).unwrap_err();
            assert!(matches!(err, YrError::InvalidDocument { .. }), "{err}");
        }
    }

    #[test]
    fn parses_location_and_sun() {
        let report = parse_report(two_day_document().as_bytes()).unwrap();

        assert_eq!(report.location.name, "Halden");
        assert_eq!(report.location.kind, "By");
        assert_eq!(report.location.country, "Norge");
        assert_eq!(report.location.timezone.id, "Europe/Oslo");
        assert_eq!(report.location.timezone.utc_offset_minutes, 120);
        assert_eq!(report.location.coordinates.altitude, 7);
        assert!((report.location.coordinates.latitude - 59.1245978642888).abs() < 1e-12);
        assert_eq!(report.location.coordinates.geobase, "ssr");
        assert_eq!(report.location.coordinates.geobase_id, "34643");

        let rise = NaiveDate::from_ymd_opt(2012, 5, 10).unwrap().and_hms_opt(4, 53, 22).unwrap();
        assert_eq!(report.sun.rise, Some(rise));
    }

    #[test]
    fn forecast_preserves_document_order() {
        let report = parse_report(two_day_document().as_bytes()).unwrap();
        let temps: Vec<f64> = report.forecast.iter().map(|e| e.temperature_c).collect();
        assert_eq!(temps, vec![4.0, 9.0, 15.0, 10.0, -1.5, 0.0, 12.0, 7.0]);

        let periods: Vec<u8> = report.forecast.iter().map(|e| e.period).collect();
        assert_eq!(periods, vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn does_not_reorder_or_deduplicate() {
        let xml = document(&[
            time_record("2012-05-11T12:00:00", "2012-05-11T18:00:00", 2, "1"),
            time_record("2012-05-10T12:00:00", "2012-05-10T18:00:00", 2, "2"),
            time_record("2012-05-10T12:00:00", "2012-05-10T18:00:00", 2, "2"),
        ]);
        let entries = parse_forecast_entries(xml.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].date(), NaiveDate::from_ymd_opt(2012, 5, 11).unwrap());
        assert_eq!(entries[1], entries[2]);
    }

    #[test]
    fn parses_entry_fields_and_weekday() {
        let report = parse_report(two_day_document().as_bytes()).unwrap();
        let e = &report.forecast[2];

        // 10 May 2012 was a Thursday.
        assert_eq!(e.weekday_index, 4);
        assert_eq!(e.weekday_name, "Thursday");
        assert_eq!(e.symbol.number, 3);
        assert_eq!(e.symbol.name, "Delvis skyet");
        assert_eq!(e.symbol.var, "03d");
        assert_eq!(e.precipitation_mm, 0.4);
        assert_eq!(e.wind_direction.deg, 190.3);
        assert_eq!(e.wind_direction.code, "S");
        assert_eq!(e.wind_direction.name, "Sør");
        assert_eq!(e.wind_speed_mps, 3.4);
        assert_eq!(e.wind_speed_name, "Lett bris");
        assert_eq!(e.temperature_unit, "celsius");
        assert_eq!(e.pressure_value, 1018.3);
        assert_eq!(e.pressure_unit, "hPa");
    }

    #[test]
    fn malformed_number_fails_whole_parse() {
        let xml = document(&[
            time_record("2012-05-10T00:00:00", "2012-05-10T06:00:00", 0, "4"),
            time_record("2012-05-10T06:00:00", "2012-05-10T12:00:00", 1, "warm"),
        ]);

        let err = parse_report(xml.as_bytes()).unwrap_err();
        match err {
            YrError::MalformedDocument(msg) => assert!(msg.contains("warm"), "{msg}"),
            other => panic!("expected malformed document, got {other}"),
        }
    }

    #[test]
    fn malformed_timestamp_fails_parse() {
        let xml = document(&[time_record("tomorrow", "2012-05-10T06:00:00", 0, "4")]);
        assert!(matches!(
            parse_report(xml.as_bytes()),
            Err(YrError::MalformedDocument(_))
        ));
    }

    #[test]
    fn wrong_root_is_malformed() {
        let err = parse_report(b"<rss><channel/></rss>").unwrap_err();
        assert!(matches!(err, YrError::MalformedDocument(_)));
    }

    #[test]
    fn missing_sun_times_are_none() {
        let xml = two_day_document().replace(
            r#"<sun rise="2012-05-10T04:53:22" set="2012-05-10T21:39:40" />"#,
            r#"<sun never_rise="true" />"#,
        );
        let report = parse_report(xml.as_bytes()).unwrap();
        assert_eq!(report.sun, Sun { rise: None, set: None });
    }

    #[test]
    fn timestamp_accepts_offsets() {
        let expected = NaiveDate::from_ymd_opt(2012, 5, 10).unwrap().and_hms_opt(14, 0, 0).unwrap();
        assert_eq!(timestamp("2012-05-10T14:00:00"), Some(expected));
        assert_eq!(timestamp("2012-05-10T14:00:00+02:00"), Some(expected));
        assert_eq!(timestamp("10.05.2012"), None);
    }
}
