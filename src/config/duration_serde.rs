//! Human-readable durations in configuration.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::{fmt, time::Duration};

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*duration).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct DurationVisitor;

    impl Visitor<'_> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a duration as seconds (number) or human-readable string (e.g. '30s', '1m30s')")
        }

        fn visit_u64<E>(self, seconds: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(seconds))
        }

        fn visit_i64<E>(self, seconds: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(seconds)
                .map(Duration::from_secs)
                .map_err(|_| de::Error::custom(format!("Invalid duration '{seconds}': must not be negative")))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let value = value.trim();
            if let Ok(seconds) = value.parse::<u64>() {
                return Ok(Duration::from_secs(seconds));
            }
            humantime::parse_duration(value)
                .map_err(|e| de::Error::custom(format!("Invalid duration '{value}': {e}")))
        }
    }

    deserializer.deserialize_any(DurationVisitor)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wrapper {
        #[serde(with = "super")]
        timeout: Duration,
    }

    #[test]
    fn test_human_readable_and_numeric_durations() {
        let parsed: Wrapper = serde_json::from_str(r#"{"timeout": "1m30s"}"#).unwrap();
        assert_eq!(parsed.timeout, Duration::from_secs(90));

        let parsed: Wrapper = serde_json::from_str(r#"{"timeout": 45}"#).unwrap();
        assert_eq!(parsed.timeout, Duration::from_secs(45));

        let parsed: Wrapper = serde_json::from_str(r#"{"timeout": "20"}"#).unwrap();
        assert_eq!(parsed.timeout, Duration::from_secs(20));

        assert!(serde_json::from_str::<Wrapper>(r#"{"timeout": "soon"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"timeout": -1}"#).is_err());
    }

    #[test]
    fn test_serializes_as_humantime() {
        let json = serde_json::to_string(&Wrapper {
            timeout: Duration::from_secs(30),
        })
        .unwrap();
        assert_eq!(json, r#"{"timeout":"30s"}"#);
    }
}
