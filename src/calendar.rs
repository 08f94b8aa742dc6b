// File: ./src/calendar.rs
//! Working-day classification.
use crate::config::{Preferences, WorkingDays};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

/// Answers whether a date is a normal work day.
pub trait WorkdayCalendar: Send + Sync {
    fn is_working_day(&self, date: NaiveDate) -> bool;
}

/// Week-day configuration from the user preferences, plus optional
/// fixed days off.
#[derive(Debug, Clone, Default)]
pub struct PreferencesCalendar {
    working_days: WorkingDays,
    days_off: HashSet<NaiveDate>,
}

impl PreferencesCalendar {
    pub fn new(working_days: WorkingDays) -> Self {
        Self {
            working_days,
            days_off: HashSet::new(),
        }
    }

    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self::new(prefs.working_days)
    }

    pub fn with_days_off(mut self, days: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.days_off.extend(days);
        self
    }
}

impl WorkdayCalendar for PreferencesCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days.is_working(date.weekday()) && !self.days_off.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_default_week_is_monday_to_friday() {
        let cal = PreferencesCalendar::default();
        // 2020-07-16 was a Thursday, 2020-07-18 a Saturday.
        assert!(cal.is_working_day(d(2020, 7, 16)));
        assert!(!cal.is_working_day(d(2020, 7, 18)));
        assert!(!cal.is_working_day(d(2020, 7, 19)));
    }

    #[test]
    fn test_days_off_override_weekdays() {
        let cal = PreferencesCalendar::default().with_days_off([d(2020, 7, 16)]);
        assert!(!cal.is_working_day(d(2020, 7, 16)));
        assert!(cal.is_working_day(d(2020, 7, 17)));
    }

    #[test]
    fn test_weekend_worker() {
        let mut days = WorkingDays::default();
        days.saturday = true;
        let cal = PreferencesCalendar::new(days);
        assert!(cal.is_working_day(d(2020, 7, 18)));
    }
}
