// File: ./src/config.rs
// User preferences read by the waiver window: date format, working days,
// default hours and the last holiday selection.
use crate::context::AppContext;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use strum::EnumIter;

fn default_true() -> bool {
    true
}
fn default_hours_per_day() -> String {
    "08:00".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
pub enum DateFormat {
    #[default]
    Iso,
    DayMonthYear,
    MonthDayYear,
}

impl DateFormat {
    fn pattern(&self) -> &'static str {
        match self {
            DateFormat::Iso => "%Y-%m-%d",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::MonthDayYear => "%m/%d/%Y",
        }
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::Iso => write!(f, "YYYY-MM-DD"),
            DateFormat::DayMonthYear => write!(f, "DD/MM/YYYY"),
            DateFormat::MonthDayYear => write!(f, "MM/DD/YYYY"),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkingDays {
    #[serde(default = "default_true")]
    pub monday: bool,
    #[serde(default = "default_true")]
    pub tuesday: bool,
    #[serde(default = "default_true")]
    pub wednesday: bool,
    #[serde(default = "default_true")]
    pub thursday: bool,
    #[serde(default = "default_true")]
    pub friday: bool,
    #[serde(default)]
    pub saturday: bool,
    #[serde(default)]
    pub sunday: bool,
}

impl Default for WorkingDays {
    fn default() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
        }
    }
}

impl WorkingDays {
    pub fn is_working(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default)]
    pub date_format: DateFormat,
    #[serde(default)]
    pub working_days: WorkingDays,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: String, // Format "HH:MM"
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            date_format: DateFormat::default(),
            working_days: WorkingDays::default(),
            hours_per_day: default_hours_per_day(),
            country: None,
            state: None,
            city: None,
        }
    }
}

impl Preferences {
    /// Load preferences from disk using an explicit context.
    /// A missing file is an error so callers can tell "first run" apart.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_preferences_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Preferences file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read preferences '{}': {}", path.display(), e)
        })?;

        let prefs: Preferences = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse preferences '{}': {}", path.display(), e)
        })?;

        Ok(prefs)
    }

    /// Defaults when the file does not exist yet; any other failure is returned.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(p) => Ok(p),
            Err(e) if Self::is_missing_preferences_error(&e) => {
                log::info!("No preferences file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_missing_preferences_error(err: &Error) -> bool {
        if err.to_string().contains("Preferences file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_preferences_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Hours used for new and imported waivers. Falls back to 08:00 when
    /// the stored value is malformed.
    pub fn default_hours(&self) -> chrono::NaiveTime {
        crate::model::range::parse_time(&self.hours_per_day).unwrap_or_else(|_| {
            log::warn!(
                "Invalid hours_per_day '{}' in preferences, using 08:00",
                self.hours_per_day
            );
            chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_file_is_recognised() {
        let ctx = TestContext::new();
        let err = Preferences::load(&ctx).unwrap_err();
        assert!(Preferences::is_missing_preferences_error(&err));
        assert_eq!(Preferences::load_or_default(&ctx).unwrap(), Preferences::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let ctx = TestContext::new();
        let mut prefs = Preferences::default();
        prefs.date_format = DateFormat::DayMonthYear;
        prefs.working_days.saturday = true;
        prefs.country = Some("US".into());
        prefs.save(&ctx).unwrap();

        let loaded = Preferences::load(&ctx).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_preferences_path().unwrap();
        fs::write(&path, "[working_days]\nfriday = false\n").unwrap();

        let prefs = Preferences::load(&ctx).unwrap();
        assert!(prefs.working_days.monday);
        assert!(!prefs.working_days.friday);
        assert!(!prefs.working_days.sunday);
        assert_eq!(prefs.hours_per_day, "08:00");
        assert_eq!(prefs.date_format, DateFormat::Iso);
    }

    #[test]
    fn test_broken_file_is_not_treated_as_missing() {
        let ctx = TestContext::new();
        let path = ctx.get_preferences_path().unwrap();
        fs::write(&path, "date_format = [").unwrap();
        assert!(Preferences::load_or_default(&ctx).is_err());
    }

    #[test]
    fn test_date_format_patterns() {
        let date = NaiveDate::from_ymd_opt(2020, 7, 16).unwrap();
        assert_eq!(DateFormat::Iso.format(date), "2020-07-16");
        assert_eq!(DateFormat::DayMonthYear.format(date), "16/07/2020");
        assert_eq!(DateFormat::MonthDayYear.format(date), "07/16/2020");
    }
}
