// File: ./src/form.rs
//! State of the "add waiver" form.
use crate::model::WaiverCandidate;
use crate::model::range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaiverForm {
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

impl WaiverForm {
    /// Form preset with both times set to `hours` (usually the
    /// configured hours per day).
    pub fn new(hours: &str) -> Self {
        let mut form = Self::default();
        form.set_hours(hours);
        form
    }

    /// Same day for start and end.
    pub fn set_dates(&mut self, day: &str) {
        self.start_date = day.to_string();
        self.end_date = day.to_string();
    }

    pub fn set_hours(&mut self, hours: &str) {
        self.start_time = hours.to_string();
        self.end_time = hours.to_string();
    }

    pub fn set_reason(&mut self, reason: &str) {
        self.reason = reason.to_string();
    }

    /// Whether the add button is enabled. Only the input itself is
    /// checked here; overlaps and working days need the store.
    pub fn can_submit(&self) -> bool {
        range::validate(
            &self.start_date,
            &self.end_date,
            &self.start_time,
            &self.end_time,
        )
        .is_ok()
    }

    pub fn candidate(&self) -> WaiverCandidate {
        WaiverCandidate {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            reason: self.reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_toggles_with_validity() {
        let mut form = WaiverForm::new("08:00");
        assert!(!form.can_submit());

        form.set_dates("2020-07-16");
        assert!(form.can_submit());

        form.end_date = "2020-07-15".into();
        assert!(!form.can_submit());

        form.set_dates("2020-07-16");
        form.set_hours("not a time");
        assert!(!form.can_submit());
    }

    #[test]
    fn test_candidate_copies_fields() {
        let mut form = WaiverForm::new("07:30");
        form.set_dates("2020-07-16");
        form.set_reason("some reason");
        let c = form.candidate();
        assert_eq!(c.start_date, "2020-07-16");
        assert_eq!(c.end_date, "2020-07-16");
        assert_eq!(c.start_time, "07:30");
        assert_eq!(c.end_time, "07:30");
        assert_eq!(c.reason, "some reason");
    }
}
