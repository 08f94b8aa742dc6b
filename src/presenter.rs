// File: ./src/presenter.rs
//! Table and selector projections for the waiver window. No business
//! rules: the input is already validated and stored.
use crate::config::DateFormat;
use crate::model::range::format_time;
use crate::model::{HolidayCandidate, RegionMap, WaiverRecord};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub key: String,
    pub start_date: NaiveDate,
    pub start: String,
    pub end: String,
    pub reason: String,
    /// `HH:MM` or `HH:MM-HH:MM` when start and end time differ.
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayRow {
    /// ISO date; identifies the row and its import toggle.
    pub id: String,
    pub date: String,
    pub name: String,
    /// "Yes"/"No", or `None` when the working-day status is unknown.
    pub working_day: Option<&'static str>,
    pub conflicts: Vec<String>,
    pub import_checked: bool,
}

impl HolidayRow {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPresenter {
    pub date_format: DateFormat,
}

impl ListPresenter {
    pub fn new(date_format: DateFormat) -> Self {
        Self { date_format }
    }

    /// Rows ordered by start date. The sort is stable: records sharing a
    /// start date keep their input order.
    pub fn render(&self, records: &[WaiverRecord]) -> Vec<DisplayRow> {
        let mut sorted: Vec<&WaiverRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.start_date);
        sorted
            .into_iter()
            .map(|r| DisplayRow {
                key: r.key.clone(),
                start_date: r.start_date,
                start: self.date_format.format(r.start_date),
                end: self.date_format.format(r.end_date),
                reason: r.reason.clone(),
                hours: if r.start_time == r.end_time {
                    format_time(r.start_time)
                } else {
                    format!("{}-{}", format_time(r.start_time), format_time(r.end_time))
                },
            })
            .collect()
    }

    /// One holiday row. The import toggle is on unless the day is
    /// explicitly not a working day: `None` counts as on.
    pub fn holiday_row(
        &self,
        date: NaiveDate,
        name: &str,
        is_working_day: Option<bool>,
        conflicts: &[String],
    ) -> HolidayRow {
        HolidayRow {
            id: date.format("%Y-%m-%d").to_string(),
            date: self.date_format.format(date),
            name: name.to_string(),
            working_day: is_working_day.map(|w| if w { "Yes" } else { "No" }),
            conflicts: conflicts.to_vec(),
            import_checked: is_working_day.unwrap_or(true),
        }
    }

    /// Holiday rows in the order given.
    pub fn render_holidays(&self, candidates: &[HolidayCandidate]) -> Vec<HolidayRow> {
        candidates
            .iter()
            .map(|c| self.holiday_row(c.date, &c.name, Some(c.is_working_day), &c.conflicts))
            .collect()
    }

    /// Selector entries with a leading empty placeholder. An empty map
    /// yields no entries at all, meaning the selector is hidden.
    pub fn options(&self, regions: &RegionMap) -> Vec<SelectOption> {
        if regions.is_empty() {
            return Vec::new();
        }
        std::iter::once(SelectOption {
            value: String::new(),
            label: "--".to_string(),
        })
        .chain(regions.iter().map(|(code, name)| SelectOption {
            value: code.clone(),
            label: name.clone(),
        }))
        .collect()
    }

    pub fn year_options(&self, years: &[i32]) -> Vec<SelectOption> {
        years
            .iter()
            .map(|y| SelectOption {
                value: y.to_string(),
                label: y.to_string(),
            })
            .collect()
    }
}
