//! Timestamps as floating-point Unix seconds, the snapshot wire format.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn to_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

/// Convert Unix seconds back to a timestamp, rounded to the microsecond.
///
/// Returns `None` for NaN, infinities and values chrono cannot represent.
pub fn from_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1_000_000.0).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}

pub(crate) fn decode<E: serde::de::Error>(seconds: f64) -> Result<DateTime<Utc>, E> {
    from_seconds(seconds).ok_or_else(|| E::custom(format!("timestamp out of range: {seconds}")))
}

/// `#[serde(with)]` helper for `Option<DateTime<Utc>>`.
pub mod seconds_opt {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        value.map(to_seconds).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<f64>::deserialize(deserializer)?.map(decode).transpose()
    }
}

/// `#[serde(with)]` helper for maps whose values are timestamps.
pub mod seconds_map {
    use super::*;

    pub fn serialize<K, S>(value: &BTreeMap<K, DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize + Ord,
        S: Serializer,
    {
        let raw: BTreeMap<&K, f64> = value.iter().map(|(k, v)| (k, to_seconds(*v))).collect();
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, K, D>(deserializer: D) -> Result<BTreeMap<K, DateTime<Utc>>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        D: Deserializer<'de>,
    {
        BTreeMap::<K, f64>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| decode(v).map(|at| (k, at)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_round_trip_micros() {
        let at = DateTime::from_timestamp(1_722_470_400, 123_456_000).unwrap();
        assert_eq!(from_seconds(to_seconds(at)), Some(at));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(from_seconds(f64::NAN).is_none());
        assert!(from_seconds(f64::INFINITY).is_none());
        assert!(from_seconds(1e300).is_none());
    }
}
