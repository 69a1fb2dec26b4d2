use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a stored millisecond timestamp back to a UTC datetime
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

fn millis_to_rfc3339(millis: i64) -> Option<String> {
    millis_to_datetime(millis).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn rfc3339_to_millis(value: &str) -> Result<i64, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.timestamp_millis())
}

/// Serde helper: millisecond timestamp on the Rust side, RFC 3339 string on the wire
///
/// Use with `#[serde(with = "shared::util::rfc3339_millis")]`.
pub mod rfc3339_millis {
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(millis: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        let text = super::millis_to_rfc3339(*millis)
            .ok_or_else(|| S::Error::custom(format!("timestamp out of range: {millis}")))?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::rfc3339_to_millis(&text).map_err(de::Error::custom)
    }
}

/// Optional variant of [`rfc3339_millis`]; `None` is `null`
pub mod option_rfc3339_millis {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(millis: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match millis {
            Some(millis) => super::rfc3339_millis::serialize(millis, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| super::rfc3339_to_millis(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "rfc3339_millis")]
        at: i64,
        #[serde(with = "option_rfc3339_millis")]
        done: Option<i64>,
    }

    #[test]
    fn test_millis_roundtrip() {
        let now = now_millis();
        let dt = millis_to_datetime(now).unwrap();
        assert_eq!(dt.timestamp_millis(), now);
    }

    #[test]
    fn test_rfc3339_serde_helpers() {
        let stamped = Stamped {
            at: 1_740_837_900_000,
            done: None,
        };
        let json = serde_json::to_value(&stamped).unwrap();
        assert_eq!(json["at"], "2025-03-01T14:05:00.000Z");
        assert!(json["done"].is_null());

        let back: Stamped = serde_json::from_value(serde_json::json!({
            "at": "2025-03-01T19:35:00.000+05:30",
            "done": "2025-03-01T14:06:00.000Z",
        }))
        .unwrap();
        assert_eq!(back.at, 1_740_837_900_000);
        assert_eq!(back.done, Some(1_740_837_960_000));

        let bad = serde_json::json!({"at": "yesterday", "done": null});
        assert!(serde_json::from_value::<Stamped>(bad).is_err());
    }
}
