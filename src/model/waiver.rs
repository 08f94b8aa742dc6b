// File: ./src/model/waiver.rs
use crate::model::range::{self, NormalizedRange};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A persisted waiver. Never edited in place: an edit is delete + add.
///
/// The key is the map key in the store and is not serialized with the
/// record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaiverRecord {
    #[serde(skip)]
    pub key: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub reason: String,
}

impl WaiverRecord {
    pub fn new(range: NormalizedRange, reason: impl Into<String>) -> Self {
        Self {
            key: range.key(),
            start_date: range.start_date,
            end_date: range.end_date,
            start_time: range.start_time,
            end_time: range.end_time,
            reason: reason.into(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        range::intervals_overlap(self.start_date, self.end_date, start, end)
    }
}

/// Raw user input for a new waiver, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaiverCandidate {
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

impl WaiverCandidate {
    /// Single-day waiver with the same start and end time.
    pub fn single_day(date: NaiveDate, hours: NaiveTime, reason: impl Into<String>) -> Self {
        let day = date.format("%Y-%m-%d").to_string();
        let time = range::format_time(hours);
        Self {
            start_date: day.clone(),
            end_date: day,
            start_time: time.clone(),
            end_time: time,
            reason: reason.into(),
        }
    }
}

/// Serde adapter writing `NaiveTime` as `HH:MM`.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&crate::model::range::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        crate::model::range::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_field_layout() {
        let range = range::validate("2020-07-16", "2020-07-17", "08:00", "17:30").unwrap();
        let record = WaiverRecord::new(range, "vacation");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["startDate"], "2020-07-16");
        assert_eq!(json["endDate"], "2020-07-17");
        assert_eq!(json["startTime"], "08:00");
        assert_eq!(json["endTime"], "17:30");
        assert_eq!(json["reason"], "vacation");
        assert!(json.get("key").is_none());
    }

    #[test]
    fn test_missing_reason_defaults_to_empty() {
        let json = r#"{"startDate":"2020-07-16","endDate":"2020-07-16","startTime":"08:00","endTime":"08:00"}"#;
        let record: WaiverRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.reason, "");
        assert!(record.key.is_empty());
    }

    #[test]
    fn test_bad_time_in_store_is_rejected() {
        let json = r#"{"startDate":"2020-07-16","endDate":"2020-07-16","startTime":"8 am","endTime":"08:00"}"#;
        assert!(serde_json::from_str::<WaiverRecord>(json).is_err());
    }
}
