// File: ./src/model/range.rs
//! Date range validation and the canonical waiver key.
//!
//! Parsing is strict: dates are `YYYY-MM-DD` with zero padding, times are
//! `HH:MM` in 24h.
use crate::error::WaiverError;
use chrono::{NaiveDate, NaiveTime};

/// A validated start/end date pair with its start/end times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl NormalizedRange {
    pub fn key(&self) -> String {
        canonical_key(self.start_date, self.end_date)
    }

    /// Closed-interval intersection with `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        intervals_overlap(self.start_date, self.end_date, start, end)
    }

    /// Every date of the range, both ends included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }
}

/// `"<start>_<end>"` in ISO format, or just `"<start>"` for a single day.
pub fn canonical_key(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        start.format("%Y-%m-%d").to_string()
    } else {
        format!("{}_{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
    }
}

/// `max(start_a, start_b) <= min(end_a, end_b)`
pub fn intervals_overlap(
    start_a: NaiveDate,
    end_a: NaiveDate,
    start_b: NaiveDate,
    end_b: NaiveDate,
) -> bool {
    start_a.max(start_b) <= end_a.min(end_b)
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

pub fn parse_date(input: &str) -> Result<NaiveDate, WaiverError> {
    let invalid = || WaiverError::InvalidDate(input.to_string());

    let mut parts = input.split('-');
    let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    if y.len() != 4 || m.len() != 2 || d.len() != 2 {
        return Err(invalid());
    }

    let year = parse_digits(y).ok_or_else(invalid)?;
    let month = parse_digits(m).ok_or_else(invalid)?;
    let day = parse_digits(d).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

pub fn parse_time(input: &str) -> Result<NaiveTime, WaiverError> {
    let invalid = || WaiverError::InvalidTime(input.to_string());

    let (h, m) = input.split_once(':').ok_or_else(invalid)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(invalid());
    }
    let hour = parse_digits(h).ok_or_else(invalid)?;
    let minute = parse_digits(m).ok_or_else(invalid)?;
    if hour >= 24 || minute >= 60 {
        return Err(invalid());
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses and checks a raw start/end date pair and time pair.
///
/// Dates are checked before times, and the range orientation last.
/// No side effects.
pub fn validate(
    start_date: &str,
    end_date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<NormalizedRange, WaiverError> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    let start_time = parse_time(start_time)?;
    let end_time = parse_time(end_time)?;

    if end < start {
        return Err(WaiverError::InvertedRange {
            start: start_date.to_string(),
            end: end_date.to_string(),
        });
    }

    Ok(NormalizedRange {
        start_date: start,
        end_date: end,
        start_time,
        end_time,
    })
}
