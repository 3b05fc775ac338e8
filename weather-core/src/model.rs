use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One hourly weather reading, as reported by the provider in the
/// location's local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub temp_c: f64,
    pub wind_kph: f64,
    pub humidity: u8,
}

/// All observations retrieved for one city over the lookback window.
///
/// Storage order is whatever the fetch produced; call [`ObservationSet::into_sorted`]
/// before analysis or plotting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSet {
    observations: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    /// Sort ascending by timestamp. Stable, so duplicate hours keep fetch order.
    pub fn sort_chronologically(&mut self) {
        self.observations.sort_by_key(|o| o.timestamp);
    }

    pub fn into_sorted(mut self) -> Self {
        self.sort_chronologically();
        self
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.temp_c).collect()
    }
}

impl FromIterator<Observation> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for ObservationSet {
    type Item = Observation;
    type IntoIter = std::vec::IntoIter<Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.into_iter()
    }
}

/// Parse a timestamp in the provider's `YYYY-MM-DD HH:MM` format; seconds are
/// accepted too.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, timestamp_format::FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
}

pub(crate) mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(raw.trim()).map_err(|e| {
            serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .expect("valid date")
    }

    fn obs(day: u32, hour: u32, temp_c: f64) -> Observation {
        Observation { timestamp: at(day, hour), temp_c, wind_kph: 5.0, humidity: 70 }
    }

    #[test]
    fn parses_minutes_and_seconds_formats() {
        assert_eq!(parse_timestamp("2024-03-05 13:00").unwrap(), at(5, 13));
        assert_eq!(parse_timestamp("2024-03-05 13:00:00").unwrap(), at(5, 13));
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn into_sorted_orders_by_timestamp() {
        let set: ObservationSet =
            vec![obs(6, 1, 3.0), obs(4, 23, 1.0), obs(6, 0, 2.0)].into_iter().collect();

        let sorted = set.into_sorted();

        let times: Vec<_> = sorted.iter().map(|o| o.timestamp).collect();
        assert_eq!(times, vec![at(4, 23), at(6, 0), at(6, 1)]);
        assert_eq!(sorted.temperatures(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn observation_serializes_timestamp_without_seconds() {
        let json = serde_json::to_value(obs(5, 7, 1.5)).unwrap();
        assert_eq!(json["timestamp"], "2024-03-05 07:00");
    }
}
