use crate::error::{IngestError, Result};
use crate::models::{DailyReading, LocationForecast};
use crate::utils::constants::{FEED_ROOT_PATH, MAX_TEMP_ELEMENT, MIN_TEMP_ELEMENT};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Reads an F-A0010-001 document and flattens it into per-location series
pub struct ForecastReader {
    strict_series: bool,
}

impl ForecastReader {
    pub fn new() -> Self {
        Self {
            strict_series: false,
        }
    }

    /// Fail on `MaxT`/`MinT` length mismatch instead of truncating
    pub fn with_strict_series(strict_series: bool) -> Self {
        Self { strict_series }
    }

    pub fn read(&self, path: &Path) -> Result<Vec<LocationForecast>> {
        let bytes = fs::read(path)?;
        let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
        if had_errors {
            warn!(path = %path.display(), "Input contains invalid UTF-8; replaced with U+FFFD");
        }

        let document: Value = serde_json::from_str(&text)?;
        self.extract_locations(&document)
    }

    pub fn extract_locations(&self, document: &Value) -> Result<Vec<LocationForecast>> {
        let mut node = document;
        let mut path = String::from("$");
        for key in FEED_ROOT_PATH {
            node = child(node, key, &path)?;
            path = format!("{}.{}", path, key);
        }

        let locations = node
            .as_array()
            .ok_or_else(|| IngestError::malformed("location", &path))?;
        debug!(count = locations.len(), "Found location entries");

        locations
            .iter()
            .enumerate()
            .map(|(i, loc)| self.extract_location(loc, &format!("{}[{}]", path, i)))
            .collect()
    }

    fn extract_location(&self, loc: &Value, path: &str) -> Result<LocationForecast> {
        let name = child(loc, "locationName", path)?
            .as_str()
            .ok_or_else(|| IngestError::malformed("locationName", path))?
            .to_string();

        let elements_path = format!("{}.weatherElements", path);
        let elements = child(loc, "weatherElements", path)?;
        let max_daily = daily_entries(elements, MAX_TEMP_ELEMENT, &elements_path)?;
        let min_daily = daily_entries(elements, MIN_TEMP_ELEMENT, &elements_path)?;

        if max_daily.len() != min_daily.len() {
            if self.strict_series {
                return Err(IngestError::SeriesLengthMismatch {
                    location: name,
                    max: max_daily.len(),
                    min: min_daily.len(),
                });
            }
            warn!(
                location = %name,
                max = max_daily.len(),
                min = min_daily.len(),
                "MaxT/MinT series differ in length; extra entries are ignored"
            );
        }

        // Entries past the shorter series are never read
        let paired = max_daily.len().min(min_daily.len());
        let max_path = format!("{}.{}", elements_path, MAX_TEMP_ELEMENT);
        let min_path = format!("{}.{}", elements_path, MIN_TEMP_ELEMENT);
        let max_series = parse_series(&max_daily[..paired], &max_path)?;
        let min_series = parse_series(&min_daily[..paired], &min_path)?;

        let forecast = LocationForecast::new(name, max_series, min_series);
        for (max_date, min_date) in forecast.mismatched_dates() {
            warn!(
                location = %forecast.name,
                max_date,
                min_date,
                "MaxT/MinT dates differ at the same position; using the MaxT date"
            );
        }

        Ok(forecast)
    }
}

impl Default for ForecastReader {
    fn default() -> Self {
        Self::new()
    }
}

fn child<'a>(node: &'a Value, key: &str, path: &str) -> Result<&'a Value> {
    node.get(key)
        .ok_or_else(|| IngestError::malformed(key, path))
}

fn daily_entries<'a>(elements: &'a Value, element: &str, path: &str) -> Result<&'a [Value]> {
    let element_path = format!("{}.{}", path, element);
    child(child(elements, element, path)?, "daily", &element_path)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| IngestError::malformed("daily", &element_path))
}

fn parse_series(entries: &[Value], element_path: &str) -> Result<Vec<DailyReading>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let entry_path = format!("{}.daily[{}]", element_path, i);
            let date = child(entry, "dataDate", &entry_path)?
                .as_str()
                .ok_or_else(|| IngestError::malformed("dataDate", &entry_path))?;
            let temperature = parse_temperature(child(entry, "temperature", &entry_path)?)?;
            Ok(DailyReading::new(date, temperature))
        })
        .collect()
}

/// Empty strings and `null` mean "no reading"; anything else must be a decimal number.
pub fn parse_temperature(value: &Value) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| IngestError::Conversion {
            value: n.to_string(),
        }),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| IngestError::Conversion { value: s.clone() }),
        other => Err(IngestError::Conversion {
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn feed(locations: Value) -> Value {
        json!({
            "cwaopendata": {
                "resources": {
                    "resource": {
                        "data": {
                            "agrWeatherForecasts": {
                                "weatherForecasts": { "location": locations }
                            }
                        }
                    }
                }
            }
        })
    }

    fn location(name: &str, max: &[(&str, &str)], min: &[(&str, &str)]) -> Value {
        let daily = |series: &[(&str, &str)]| -> Vec<Value> {
            series
                .iter()
                .map(|(d, t)| json!({ "dataDate": d, "temperature": t }))
                .collect()
        };
        json!({
            "locationName": name,
            "weatherElements": {
                "MaxT": { "daily": daily(max) },
                "MinT": { "daily": daily(min) }
            }
        })
    }

    #[test]
    fn test_extract_single_location() -> Result<()> {
        let doc = feed(json!([location(
            "臺北市",
            &[("2024-01-01", "18.5")],
            &[("2024-01-01", "")]
        )]));

        let locations = ForecastReader::new().extract_locations(&doc)?;

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].name, "臺北市");
        assert_eq!(
            locations[0].max_series,
            vec![DailyReading::new("2024-01-01", Some(18.5))]
        );
        assert_eq!(
            locations[0].min_series,
            vec![DailyReading::new("2024-01-01", None)]
        );
        Ok(())
    }

    #[test]
    fn test_missing_root_key_is_named() {
        let doc = json!({ "cwaopendata": { "resources": {} } });

        match ForecastReader::new().extract_locations(&doc) {
            Err(IngestError::MalformedInput { key, path }) => {
                assert_eq!(key, "resource");
                assert_eq!(path, "$.cwaopendata.resources");
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_weather_elements_is_named() {
        let doc = feed(json!([
            location("臺北市", &[("2024-01-01", "18")], &[("2024-01-01", "12")]),
            { "locationName": "新北市" }
        ]));

        match ForecastReader::new().extract_locations(&doc) {
            Err(IngestError::MalformedInput { key, path }) => {
                assert_eq!(key, "weatherElements");
                assert!(path.ends_with("location[1]"));
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_min_series_is_named() {
        let doc = feed(json!([{
            "locationName": "臺中市",
            "weatherElements": { "MaxT": { "daily": [] } }
        }]));

        assert!(matches!(
            ForecastReader::new().extract_locations(&doc),
            Err(IngestError::MalformedInput { key, .. }) if key == "MinT"
        ));
    }

    #[test]
    fn test_series_mismatch_truncates_or_fails_when_strict() -> Result<()> {
        let doc = feed(json!([location(
            "高雄市",
            &[("2024-01-01", "25"), ("2024-01-02", "26")],
            &[("2024-01-01", "19")]
        )]));

        let locations = ForecastReader::new().extract_locations(&doc)?;
        assert_eq!(locations[0].max_series.len(), 1);
        assert_eq!(locations[0].daily_rows().len(), 1);

        assert!(matches!(
            ForecastReader::with_strict_series(true).extract_locations(&doc),
            Err(IngestError::SeriesLengthMismatch { max: 2, min: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_unpaired_trailing_entries_are_not_parsed() -> Result<()> {
        let doc = feed(json!([{
            "locationName": "臺東縣",
            "weatherElements": {
                "MaxT": { "daily": [
                    { "dataDate": "2024-01-01", "temperature": "18.5" },
                    { "dataDate": "2024-01-02", "temperature": "N/A" },
                    { "dataDate": "2024-01-03" }
                ] },
                "MinT": { "daily": [
                    { "dataDate": "2024-01-01", "temperature": "12" }
                ] }
            }
        }]));

        let locations = ForecastReader::new().extract_locations(&doc)?;

        assert_eq!(
            locations[0].max_series,
            vec![DailyReading::new("2024-01-01", Some(18.5))]
        );
        assert_eq!(
            locations[0].min_series,
            vec![DailyReading::new("2024-01-01", Some(12.0))]
        );
        Ok(())
    }

    #[test]
    fn test_empty_location_name_is_kept() -> Result<()> {
        let doc = feed(json!([location("", &[("2024-01-01", "20")], &[("2024-01-01", "")])]));

        let locations = ForecastReader::new().extract_locations(&doc)?;
        assert_eq!(locations[0].name, "");
        assert_eq!(locations[0].daily_rows().len(), 1);
        Ok(())
    }

    #[test]
    fn test_non_numeric_temperature_fails() {
        let doc = feed(json!([location(
            "花蓮縣",
            &[("2024-01-01", "warm")],
            &[("2024-01-01", "15")]
        )]));

        assert!(matches!(
            ForecastReader::new().extract_locations(&doc),
            Err(IngestError::Conversion { value }) if value == "warm"
        ));
    }

    #[test]
    fn test_parse_temperature() -> Result<()> {
        assert_eq!(parse_temperature(&json!(""))?, None);
        assert_eq!(parse_temperature(&json!("  "))?, None);
        assert_eq!(parse_temperature(&Value::Null)?, None);
        assert_eq!(parse_temperature(&json!("18.5"))?, Some(18.5));
        assert_eq!(parse_temperature(&json!(" -3 "))?, Some(-3.0));
        assert_eq!(parse_temperature(&json!(21.25))?, Some(21.25));
        assert!(parse_temperature(&json!(true)).is_err());
        Ok(())
    }

    #[test]
    fn test_read_strips_bom() -> Result<()> {
        let doc = feed(json!([location(
            "臺南市",
            &[("2024-01-01", "24")],
            &[("2024-01-01", "17")]
        )]));
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend(serde_json::to_vec(&doc)?);

        let file = tempfile::NamedTempFile::new()?;
        std::fs::write(file.path(), bytes)?;

        let locations = ForecastReader::new().read(file.path())?;
        assert_eq!(locations[0].name, "臺南市");
        Ok(())
    }
}
