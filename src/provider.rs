// File: ./src/provider.rs
//! Holiday data: the provider capability and a table-driven provider.
//!
//! The table is a JSON document of countries, each with optional states,
//! each with optional regions:
//!
//! ```json
//! { "US": { "name": "United States",
//!           "holidays": [ { "date": "01-01", "name": "New Year's Day" } ],
//!           "subdivisions": { "CA": { "name": "California", "holidays": [],
//!                                     "subdivisions": { "LA": { "name": "Los Angeles" } } } } } }
//! ```
//!
//! `date` is `MM-DD` for a holiday on that day every year or `YYYY-MM-DD`
//! for a one-off.
use crate::context::AppContext;
use crate::model::range::parse_date;
use crate::model::{Holiday, RegionMap};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

/// Holiday lookups offered by the host.
#[allow(async_fn_in_trait)]
pub trait HolidayProvider: Send + Sync {
    /// Holidays of `year` at the given scope, including those inherited
    /// from the broader levels.
    async fn get_holidays(
        &self,
        country: &str,
        state: Option<&str>,
        city: Option<&str>,
        year: i32,
    ) -> Result<Vec<Holiday>>;
    async fn get_countries(&self) -> Result<RegionMap>;
    async fn get_states(&self, country: &str) -> Result<RegionMap>;
    async fn get_regions(&self, country: &str, state: &str) -> Result<RegionMap>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayRule {
    pub date: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_working_day: Option<bool>,
}

impl HolidayRule {
    /// The date this rule falls on in `year`, if any.
    pub fn on(&self, year: i32) -> Option<NaiveDate> {
        match self.date.len() {
            5 => parse_date(&format!("{:04}-{}", year, self.date)).ok(),
            10 => parse_date(&self.date).ok().filter(|d| d.year() == year),
            _ => None,
        }
    }

    fn is_well_formed(&self) -> bool {
        match self.date.len() {
            // Any leap year accepts every valid MM-DD.
            5 => parse_date(&format!("2000-{}", self.date)).is_ok(),
            10 => parse_date(&self.date).is_ok(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub name: String,
    #[serde(default)]
    pub holidays: Vec<HolidayRule>,
    #[serde(default)]
    pub subdivisions: BTreeMap<String, RegionEntry>,
}

fn names(entries: &BTreeMap<String, RegionEntry>) -> RegionMap {
    entries
        .iter()
        .map(|(code, entry)| (code.clone(), entry.name.clone()))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct TableHolidayProvider {
    countries: BTreeMap<String, RegionEntry>,
}

impl TableHolidayProvider {
    pub fn new(countries: BTreeMap<String, RegionEntry>) -> Self {
        let provider = Self { countries };
        provider.warn_malformed();
        provider
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let countries: BTreeMap<String, RegionEntry> =
            serde_json::from_str(json).context("Failed to parse holiday table")?;
        Ok(Self::new(countries))
    }

    /// Loads `holidays.json` from the data directory. A missing table
    /// yields an empty provider.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_holiday_table_path()?;
        if !path.exists() {
            log::warn!("No holiday table at {:?}; holiday import is empty", path);
            return Ok(Self::default());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read holiday table {:?}", path))?;
        Self::from_json(&json)
    }

    fn warn_malformed(&self) {
        fn walk(code: &str, entry: &RegionEntry) {
            for rule in entry.holidays.iter().filter(|r| !r.is_well_formed()) {
                log::warn!(
                    "Ignoring holiday '{}' in {}: bad date '{}'",
                    rule.name,
                    code,
                    rule.date
                );
            }
            for (sub, child) in &entry.subdivisions {
                walk(&format!("{}-{}", code, sub), child);
            }
        }
        for (code, entry) in &self.countries {
            walk(code, entry);
        }
    }

    fn scope_chain(
        &self,
        country: &str,
        state: Option<&str>,
        city: Option<&str>,
    ) -> Vec<&RegionEntry> {
        let mut chain = Vec::new();
        let Some(c) = self.countries.get(country) else {
            return chain;
        };
        chain.push(c);
        if let Some(s) = state.and_then(|s| c.subdivisions.get(s)) {
            chain.push(s);
            if let Some(r) = city.and_then(|r| s.subdivisions.get(r)) {
                chain.push(r);
            }
        }
        chain
    }
}

impl HolidayProvider for TableHolidayProvider {
    async fn get_holidays(
        &self,
        country: &str,
        state: Option<&str>,
        city: Option<&str>,
        year: i32,
    ) -> Result<Vec<Holiday>> {
        let mut holidays: Vec<Holiday> = self
            .scope_chain(country, state, city)
            .into_iter()
            .flat_map(|entry| entry.holidays.iter())
            .filter_map(|rule| {
                rule.on(year).map(|date| Holiday {
                    date,
                    name: rule.name.clone(),
                    is_working_day: rule.is_working_day,
                })
            })
            .collect();
        holidays.sort_by_key(|h| h.date);
        Ok(holidays)
    }

    async fn get_countries(&self) -> Result<RegionMap> {
        Ok(names(&self.countries))
    }

    async fn get_states(&self, country: &str) -> Result<RegionMap> {
        Ok(self
            .countries
            .get(country)
            .map(|c| names(&c.subdivisions))
            .unwrap_or_default())
    }

    async fn get_regions(&self, country: &str, state: &str) -> Result<RegionMap> {
        Ok(self
            .countries
            .get(country)
            .and_then(|c| c.subdivisions.get(state))
            .map(|s| names(&s.subdivisions))
            .unwrap_or_default())
    }
}
