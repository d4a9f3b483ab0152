// =============================================================================
// Shared types used across the indicator service
// =============================================================================
//
// `RawSample` is what the transport hands us: every field optional, prices as
// either JSON numbers or numeric strings.  `Sample` is the validated, immutable
// observation that flows through the rest of the pipeline.
// =============================================================================

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::ingest::IngestError;

/// Timestamp layout sent by the legacy price scraper (`2024-05-01 13:37:00`).
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One validated OHLC observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub timestamp: DateTime<Utc>,
}

/// Unvalidated observation exactly as it arrived on the wire.
///
/// A `null` and an absent key are treated the same way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSample {
    #[serde(default)]
    pub open: Option<serde_json::Value>,
    #[serde(default)]
    pub high: Option<serde_json::Value>,
    #[serde(default)]
    pub low: Option<serde_json::Value>,
    #[serde(default)]
    pub close: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

impl TryFrom<RawSample> for Sample {
    type Error = IngestError;

    fn try_from(raw: RawSample) -> Result<Self, Self::Error> {
        Ok(Sample {
            open: parse_price(raw.open.as_ref(), "open")?,
            high: parse_price(raw.high.as_ref(), "high")?,
            low: parse_price(raw.low.as_ref(), "low")?,
            close: parse_price(raw.close.as_ref(), "close")?,
            timestamp: parse_timestamp(raw.timestamp.as_ref())?,
        })
    }
}

/// Price feeds send numbers either as JSON numbers or as JSON strings.
fn parse_price(val: Option<&serde_json::Value>, field: &'static str) -> Result<f64, IngestError> {
    let parsed = match val {
        None | Some(serde_json::Value::Null) => {
            return Err(IngestError::malformed(field, "missing"));
        }
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => {
            return Err(IngestError::malformed(field, "unexpected JSON type"));
        }
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(IngestError::malformed(field, "not a finite number")),
        None => Err(IngestError::malformed(field, "not a number")),
    }
}

/// Accepts RFC 3339, the legacy `YYYY-MM-DD HH:MM:SS` form (read as UTC), or
/// integer epoch milliseconds.
fn parse_timestamp(val: Option<&serde_json::Value>) -> Result<DateTime<Utc>, IngestError> {
    const FIELD: &str = "timestamp";

    match val {
        None | Some(serde_json::Value::Null) => Err(IngestError::malformed(FIELD, "missing")),
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(IngestError::malformed(FIELD, "missing"));
            }
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Ok(ts.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(s, LEGACY_TIMESTAMP_FORMAT)
                .map(|naive| naive.and_utc())
                .map_err(|_| IngestError::malformed(FIELD, format!("unrecognised format: {s}")))
        }
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(|| IngestError::malformed(FIELD, "epoch millis out of range")),
        Some(_) => Err(IngestError::malformed(FIELD, "unexpected JSON type")),
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawSample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_numbers_and_legacy_timestamp() {
        let sample = Sample::try_from(raw(json!({
            "open": 1.0, "high": 2.5, "low": 0.5, "close": 2.0,
            "timestamp": "2024-05-01 13:37:00"
        })))
        .unwrap();

        assert_eq!(sample.high, 2.5);
        assert_eq!(sample.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 13, 37, 0).unwrap());
    }

    #[test]
    fn parses_string_prices_and_rfc3339() {
        let sample = Sample::try_from(raw(json!({
            "open": "37000.00", "high": "37050.5", "low": "36990", "close": " 37020.25 ",
            "timestamp": "2024-05-01T13:37:00+02:00"
        })))
        .unwrap();

        assert!((sample.close - 37020.25).abs() < f64::EPSILON);
        assert_eq!(sample.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 11, 37, 0).unwrap());
    }

    #[test]
    fn parses_epoch_millis() {
        let sample = Sample::try_from(raw(json!({
            "open": 1, "high": 1, "low": 1, "close": 1, "timestamp": 1_700_000_000_000_i64
        })))
        .unwrap();
        assert_eq!(sample.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn zero_price_is_a_real_value() {
        let sample = Sample::try_from(raw(json!({
            "open": 0, "high": 0, "low": 0, "close": 0, "timestamp": "2024-05-01 00:00:00"
        })));
        assert!(sample.is_ok());
    }

    #[test]
    fn missing_field_names_the_field() {
        let err = Sample::try_from(raw(json!({
            "open": 1.0, "high": 2.0, "close": 1.5, "timestamp": "2024-05-01 00:00:00"
        })))
        .unwrap_err();
        assert!(matches!(err, IngestError::MalformedSample { field: "low", .. }));
    }

    #[test]
    fn null_is_treated_as_missing() {
        let err = Sample::try_from(raw(json!({
            "open": 1.0, "high": 2.0, "low": 0.5, "close": null, "timestamp": "2024-05-01 00:00:00"
        })))
        .unwrap_err();
        assert!(matches!(err, IngestError::MalformedSample { field: "close", .. }));
    }

    #[test]
    fn rejects_garbage_values() {
        let err = Sample::try_from(raw(json!({
            "open": "abc", "high": 2.0, "low": 0.5, "close": 1.0, "timestamp": "2024-05-01 00:00:00"
        })))
        .unwrap_err();
        assert!(matches!(err, IngestError::MalformedSample { field: "open", .. }));

        let err = Sample::try_from(raw(json!({
            "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.0, "timestamp": "yesterday"
        })))
        .unwrap_err();
        assert!(matches!(err, IngestError::MalformedSample { field: "timestamp", .. }));

        let err = Sample::try_from(raw(json!({
            "open": 1.0, "high": [2.0], "low": 0.5, "close": 1.0, "timestamp": "2024-05-01 00:00:00"
        })))
        .unwrap_err();
        assert!(matches!(err, IngestError::MalformedSample { field: "high", .. }));
    }

    #[test]
    fn rejects_non_finite_string_price() {
        let err = Sample::try_from(raw(json!({
            "open": "NaN", "high": 2.0, "low": 0.5, "close": 1.0, "timestamp": "2024-05-01 00:00:00"
        })))
        .unwrap_err();
        assert!(matches!(err, IngestError::MalformedSample { field: "open", .. }));
    }
}
