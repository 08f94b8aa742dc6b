// File: ./src/importer.rs
//! Public holiday import.
//!
//! Fetching is read-only: candidates are annotated with their working-day
//! status and the stored waivers they collide with, then handed to the
//! user. Only `import` writes, one candidate at a time through the
//! reconciler, so a candidate colliding with one imported a moment
//! earlier is reported rather than skipped.
use crate::calendar::WorkdayCalendar;
use crate::error::WaiverError;
use crate::model::{HolidayCandidate, RegionMap, SelectionContext, WaiverCandidate, WaiverRecord};
use crate::provider::HolidayProvider;
use crate::reconciler::{WaiverReconciler, find_conflicts};
use crate::store::WaiverBackend;
use chrono::{NaiveDate, NaiveTime};

/// Number of years offered in the year selector, starting at the current one.
pub const YEAR_OPTION_COUNT: i32 = 10;

pub fn year_options(this_year: i32) -> Vec<i32> {
    (this_year..this_year + YEAR_OPTION_COUNT).collect()
}

fn provider_error(e: anyhow::Error) -> WaiverError {
    WaiverError::StoreUnavailable(format!("holiday provider: {:#}", e))
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<WaiverRecord>,
    pub rejected: Vec<(NaiveDate, WaiverError)>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

pub struct HolidayImporter<P> {
    provider: P,
}

impl<P: HolidayProvider> HolidayImporter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn countries(&self) -> Result<RegionMap, WaiverError> {
        self.provider.get_countries().await.map_err(provider_error)
    }

    /// Empty when the country has no subdivisions; the state selector is
    /// then hidden.
    pub async fn states(&self, country: &str) -> Result<RegionMap, WaiverError> {
        self.provider.get_states(country).await.map_err(provider_error)
    }

    pub async fn regions(&self, country: &str, state: &str) -> Result<RegionMap, WaiverError> {
        self.provider
            .get_regions(country, state)
            .await
            .map_err(provider_error)
    }

    /// Holidays for the selection, in provider order, each annotated
    /// against the current store. Without a country nothing is queried.
    pub async fn fetch_candidates<B, C>(
        &self,
        selection: &SelectionContext,
        reconciler: &WaiverReconciler<B, C>,
    ) -> Result<Vec<HolidayCandidate>, WaiverError>
    where
        B: WaiverBackend,
        C: WorkdayCalendar,
    {
        let Some((country, state, city)) = selection.scope() else {
            log::debug!("No country selected, skipping holiday lookup");
            return Ok(Vec::new());
        };

        let holidays = self
            .provider
            .get_holidays(country, state, city, selection.year)
            .await
            .map_err(provider_error)?;
        let records = reconciler.store().list().await?;

        let candidates: Vec<HolidayCandidate> = holidays
            .into_iter()
            .map(|h| HolidayCandidate {
                is_working_day: reconciler.calendar().is_working_day(h.date)
                    && h.is_working_day.unwrap_or(true),
                conflicts: find_conflicts(&records, h.date, h.date),
                date: h.date,
                name: h.name,
            })
            .collect();

        log::info!(
            "Fetched {} holiday(s) for {}/{}/{} {}",
            candidates.len(),
            country,
            state.unwrap_or("-"),
            city.unwrap_or("-"),
            selection.year
        );
        Ok(candidates)
    }

    /// Submits each accepted candidate as a single-day waiver named after
    /// the holiday, in order. Failures are collected, not fatal.
    pub async fn import<B, C>(
        &self,
        reconciler: &WaiverReconciler<B, C>,
        accepted: &[HolidayCandidate],
        hours: NaiveTime,
    ) -> ImportReport
    where
        B: WaiverBackend,
        C: WorkdayCalendar,
    {
        let mut report = ImportReport::default();
        for candidate in accepted {
            let waiver = WaiverCandidate::single_day(candidate.date, hours, candidate.name.clone());
            match reconciler.add_waiver(&waiver).await {
                Ok(record) => report.imported.push(record),
                Err(e) => {
                    log::warn!("Holiday {} ({}) not imported: {}", candidate.date, candidate.name, e);
                    report.rejected.push((candidate.date, e));
                }
            }
        }
        log::info!(
            "Holiday import: {} imported, {} rejected",
            report.imported.len(),
            report.rejected.len()
        );
        report
    }
}
