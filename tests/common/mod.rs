#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use weather_trends::{HttpSession, RetryPolicy};

/// A session that never sleeps between attempts.
pub fn session(retries: u32) -> HttpSession {
    HttpSession::builder()
        .retry(RetryPolicy::new(retries, 0.0))
        .build()
        .unwrap()
}

/// An archive response with one value per hour for `days` days starting at `start`,
/// where the value is the hour index.
pub fn archive_body(start: NaiveDate, days: i64, variable: &str) -> Value {
    let first = Utc
        .from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap())
        .timestamp();
    let hours = days * 24;
    let time: Vec<i64> = (0..hours).map(|h| first + h * 3600).collect();
    let values: Vec<f64> = (0..hours).map(|h| h as f64).collect();
    let mut hourly = serde_json::Map::new();
    hourly.insert("time".to_string(), json!(time));
    hourly.insert(variable.to_string(), json!(values));
    json!({
        "latitude": 40.23,
        "longitude": -111.66,
        "generationtime_ms": 1.2,
        "utc_offset_seconds": 0,
        "timezone": "GMT",
        "timezone_abbreviation": "GMT",
        "elevation": 1387.0,
        "hourly": hourly
    })
}

pub fn geocode_body() -> Value {
    json!({
        "standard": { "city": "Provo", "prov": "UT", "countryname": "United States of America" },
        "longt": "-111.65853",
        "latt": "40.23384"
    })
}
