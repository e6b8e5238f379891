//! ISO-8601 timestamp serialization with millisecond precision.
//!
//! Persisted records carry timestamps like `2026-10-19T08:30:00.123Z`. Any
//! RFC 3339 string is accepted on read and normalized to UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse<E: serde::de::Error>(raw: &str) -> Result<DateTime<Utc>, E> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| E::custom(format!("invalid timestamp {:?}: {}", raw, e)))
}

/// `#[serde(with = "iso_millis")]` for `DateTime<Utc>` fields.
pub mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw)
    }
}

/// `#[serde(with = "iso_millis_option")]` for `Option<DateTime<Utc>>` fields.
pub mod iso_millis_option {
    use super::*;

    pub fn serialize<S: Serializer>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_some(&format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|r| parse(&r)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Stamped {
        #[serde(with = "iso_millis")]
        at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_millis_option")]
        maybe: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_serializes_with_millis_and_z() {
        let at = Utc.timestamp_millis_opt(1_760_862_600_123).unwrap();
        let json = serde_json::to_string(&Stamped { at, maybe: None }).unwrap();
        assert_eq!(json, r#"{"at":"2025-10-19T08:30:00.123Z"}"#);
    }

    #[test]
    fn test_accepts_offset_timestamps() {
        let parsed: Stamped = serde_json::from_str(r#"{"at":"2025-10-19T10:30:00.123+02:00"}"#).unwrap();
        assert_eq!(parsed.at, Utc.timestamp_millis_opt(1_760_862_600_123).unwrap());
        assert_eq!(parsed.maybe, None);
    }

    #[test]
    fn test_optional_present() {
        let parsed: Stamped =
            serde_json::from_str(r#"{"at":"2025-10-19T08:30:00.000Z","maybe":"2025-10-20T08:30:00.000Z"}"#).unwrap();
        assert!(parsed.maybe.is_some());
    }

    #[test]
    fn test_optional_null_is_none() {
        let parsed: Stamped = serde_json::from_str(r#"{"at":"2025-10-19T08:30:00.000Z","maybe":null}"#).unwrap();
        assert_eq!(parsed.maybe, None);
    }

    #[test]
    fn test_rejects_garbage() {
        let result: Result<Stamped, _> = serde_json::from_str(r#"{"at":"yesterday"}"#);
        assert!(result.is_err());
    }
}
