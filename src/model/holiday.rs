// File: ./src/model/holiday.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Code -> display name, ordered by code.
pub type RegionMap = BTreeMap<String, String>;

/// One holiday as returned by a holiday provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_working_day: Option<bool>,
}

/// A holiday pending review before import. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCandidate {
    pub date: NaiveDate,
    pub name: String,
    pub is_working_day: bool,
    /// Keys of stored waivers whose range includes `date`.
    pub conflicts: Vec<String>,
}

impl HolidayCandidate {
    /// Stable row identifier. Two holidays with the same display text
    /// still differ by date.
    pub fn id(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// The country/state/city/year picked in the holiday section.
///
/// Setting a broader level clears the narrower ones, the way the
/// cascading selectors behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionContext {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub year: i32,
}

impl SelectionContext {
    pub fn new(year: i32) -> Self {
        Self {
            country: None,
            state: None,
            city: None,
            year,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.set_country(Some(country.into()));
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.set_state(Some(state.into()));
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.set_city(Some(city.into()));
        self
    }

    pub fn set_country(&mut self, country: Option<String>) {
        self.country = non_empty(country);
        self.state = None;
        self.city = None;
    }

    pub fn set_state(&mut self, state: Option<String>) {
        self.state = non_empty(state);
        self.city = None;
    }

    pub fn set_city(&mut self, city: Option<String>) {
        self.city = non_empty(city);
    }

    /// Back to "nothing selected"; the year is kept.
    pub fn reset(&mut self) {
        self.country = None;
        self.state = None;
        self.city = None;
    }

    /// The (country, state, city) triple to query, narrowed to what is
    /// consistently selected: a city without a state is ignored.
    pub fn scope(&self) -> Option<(&str, Option<&str>, Option<&str>)> {
        let country = self.country.as_deref()?;
        let state = self.state.as_deref();
        let city = state.and(self.city.as_deref());
        Some((country, state, city))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_change_clears_narrower_levels() {
        let mut sel = SelectionContext::new(2020)
            .with_country("US")
            .with_state("CA")
            .with_city("LA");
        assert_eq!(sel.scope(), Some(("US", Some("CA"), Some("LA"))));

        sel.set_country(Some("DE".into()));
        assert_eq!(sel.state, None);
        assert_eq!(sel.city, None);
        assert_eq!(sel.scope(), Some(("DE", None, None)));
    }

    #[test]
    fn test_empty_selection_has_no_scope() {
        let mut sel = SelectionContext::new(2020);
        assert_eq!(sel.scope(), None);
        sel.set_country(Some("  ".into()));
        assert_eq!(sel.scope(), None);
    }

    #[test]
    fn test_city_without_state_is_ignored() {
        let mut sel = SelectionContext::new(2020).with_country("US");
        sel.city = Some("LA".into());
        assert_eq!(sel.scope(), Some(("US", None, None)));
    }

    #[test]
    fn test_reset_keeps_year() {
        let mut sel = SelectionContext::new(2031).with_country("US").with_state("CA");
        sel.reset();
        assert_eq!(sel, SelectionContext::new(2031));
    }
}
