use crate::series::error::SeriesError;
use crate::series::payload::HourlyPayload;
use crate::types::variable::WeatherVariable;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Sample spacing assumed when the time axis has a single entry.
const DEFAULT_INTERVAL_SECS: i64 = 3600;

/// The archive's JSON response, requested with `timeformat=unixtime`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub hourly: Option<HourlyBlock>,
}

/// `hourly.time` plus one array per requested variable.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Option<Vec<i64>>,
    #[serde(flatten)]
    pub variables: HashMap<String, Value>,
}

impl ArchiveResponse {
    /// Reduces the response to the payload of one variable.
    ///
    /// The time axis must be evenly spaced; `null` values become absent samples.
    ///
    /// # Errors
    ///
    /// * [`SeriesError::MissingField`] if `hourly`, `hourly.time` or the variable is missing.
    /// * [`SeriesError::Malformed`] if the time axis is uneven or a value is not a number.
    pub fn hourly_payload(&self, variable: WeatherVariable) -> Result<HourlyPayload, SeriesError> {
        let hourly = self
            .hourly
            .as_ref()
            .ok_or_else(|| SeriesError::MissingField("hourly".to_string()))?;
        let time = hourly
            .time
            .as_ref()
            .ok_or_else(|| SeriesError::MissingField("hourly.time".to_string()))?;
        let raw = hourly
            .variables
            .get(variable.api_name())
            .ok_or_else(|| SeriesError::MissingField(format!("hourly.{}", variable.api_name())))?;
        let values = value_array(variable.api_name(), raw)?;

        let (Some(&start), Some(&last)) = (time.first(), time.last()) else {
            return Ok(HourlyPayload::new(0, 0, DEFAULT_INTERVAL_SECS, values)
                .with_utc_offset(self.utc_offset_seconds));
        };
        let interval = match time.get(1) {
            Some(&second) => second.checked_sub(start).ok_or_else(|| {
                SeriesError::Malformed(format!("time step from {start} to {second} overflows"))
            })?,
            None => DEFAULT_INTERVAL_SECS,
        };
        if let Some(pair) = time
            .windows(2)
            .find(|pair| pair[1].checked_sub(pair[0]) != Some(interval))
        {
            return Err(SeriesError::Malformed(format!(
                "uneven time axis: {} is followed by {}, expected a step of {} seconds",
                pair[0], pair[1], interval
            )));
        }
        let end = last.checked_add(interval).ok_or_else(|| {
            SeriesError::Malformed(format!("time axis end after {last} overflows"))
        })?;

        Ok(HourlyPayload::new(start, end, interval, values)
            .with_utc_offset(self.utc_offset_seconds))
    }
}

fn value_array(name: &str, raw: &Value) -> Result<Vec<Option<f64>>, SeriesError> {
    let items = raw
        .as_array()
        .ok_or_else(|| SeriesError::Malformed(format!("hourly.{name} is not an array")))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| SeriesError::Malformed(format!("hourly.{name}[{i}] = {n}"))),
            other => Err(SeriesError::Malformed(format!(
                "hourly.{name}[{i}] is not a number: {other}"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> ArchiveResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_payload_from_response() {
        let response = parse(json!({
            "latitude": 35.04,
            "longitude": -85.31,
            "generationtime_ms": 0.5,
            "utc_offset_seconds": 0,
            "timezone": "GMT",
            "hourly_units": {"time": "unixtime", "temperature_2m": "°F"},
            "hourly": {
                "time": [1704067200, 1704070800, 1704074400],
                "temperature_2m": [40.1, null, 39.5]
            }
        }));
        let payload = response.hourly_payload(WeatherVariable::Temperature).unwrap();
        assert_eq!(payload.start, 1_704_067_200);
        assert_eq!(payload.interval, 3600);
        assert_eq!(payload.end, 1_704_078_000);
        assert_eq!(payload.values, vec![Some(40.1), None, Some(39.5)]);
    }

    #[test]
    fn test_single_sample_assumes_hourly() {
        let response = parse(json!({
            "latitude": 0.0, "longitude": 0.0, "utc_offset_seconds": -18000,
            "hourly": {"time": [100], "precipitation": [0.0]}
        }));
        let payload = response.hourly_payload(WeatherVariable::Precipitation).unwrap();
        assert_eq!(payload.end, 3700);
        assert_eq!(payload.utc_offset_seconds, -18000);
    }

    #[test]
    fn test_missing_fields() {
        let no_hourly = parse(json!({"latitude": 0.0, "longitude": 0.0}));
        assert!(matches!(
            no_hourly.hourly_payload(WeatherVariable::Temperature),
            Err(SeriesError::MissingField(f)) if f == "hourly"
        ));

        let no_variable = parse(json!({
            "latitude": 0.0, "longitude": 0.0,
            "hourly": {"time": [0, 3600], "temperature_2m": [1.0, 2.0]}
        }));
        assert!(matches!(
            no_variable.hourly_payload(WeatherVariable::DewPoint),
            Err(SeriesError::MissingField(f)) if f == "hourly.dew_point_2m"
        ));
    }

    #[test]
    fn test_uneven_time_axis() {
        let response = parse(json!({
            "latitude": 0.0, "longitude": 0.0,
            "hourly": {"time": [0, 3600, 9000], "temperature_2m": [1.0, 2.0, 3.0]}
        }));
        let err = response.hourly_payload(WeatherVariable::Temperature).unwrap_err();
        assert!(matches!(err, SeriesError::Malformed(_)));
        assert!(err.is_data_format());
    }

    #[test]
    fn test_overflowing_time_axis() {
        let response = parse(json!({
            "latitude": 0.0, "longitude": 0.0,
            "hourly": {"time": [i64::MIN, i64::MAX], "temperature_2m": [1.0, 2.0]}
        }));
        let err = response.hourly_payload(WeatherVariable::Temperature).unwrap_err();
        assert!(matches!(err, SeriesError::Malformed(_)));

        let past_the_end = parse(json!({
            "latitude": 0.0, "longitude": 0.0,
            "hourly": {"time": [i64::MAX - 10, i64::MAX], "temperature_2m": [1.0, 2.0]}
        }));
        assert!(matches!(
            past_the_end.hourly_payload(WeatherVariable::Temperature),
            Err(SeriesError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_numeric_value() {
        let response = parse(json!({
            "latitude": 0.0, "longitude": 0.0,
            "hourly": {"time": [0], "temperature_2m": ["warm"]}
        }));
        assert!(matches!(
            response.hourly_payload(WeatherVariable::Temperature),
            Err(SeriesError::Malformed(_))
        ));
    }
}
