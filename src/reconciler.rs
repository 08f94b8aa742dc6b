// File: ./src/reconciler.rs
//! Admission of new waivers.
//!
//! `add_waiver` is check-then-act: validate, scan the store for the key
//! and for overlapping ranges, check the range holds a working day, then
//! write. The store offers no multi-key transaction, so the scan and the
//! write are two separate store calls. Another writer of the same store
//! (a second window or process) that commits between them can leave two
//! overlapping records behind. That window is accepted and not hidden:
//! all of it lives in `check_overlap` and the single `set` that follows.
use crate::calendar::WorkdayCalendar;
use crate::error::WaiverError;
use crate::model::range::{self, NormalizedRange};
use crate::model::{WaiverCandidate, WaiverRecord};
use crate::store::{WaiverBackend, WaiverStore};
use chrono::NaiveDate;

/// Keys of `records` whose range intersects `[start, end]`.
pub fn find_conflicts(records: &[WaiverRecord], start: NaiveDate, end: NaiveDate) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.overlaps(start, end))
        .map(|r| r.key.clone())
        .collect()
}

pub fn has_working_day(calendar: &dyn WorkdayCalendar, range: &NormalizedRange) -> bool {
    range.days().any(|day| calendar.is_working_day(day))
}

/// Pre-write scan: fails when the canonical key exists or a stored range
/// intersects `range`.
pub async fn check_overlap<B: WaiverBackend>(
    store: &WaiverStore<B>,
    range: &NormalizedRange,
) -> Result<(), WaiverError> {
    let key = range.key();
    let exists = store.has(&key).await?;
    let records = store.list().await?;
    let conflicts = find_conflicts(&records, range.start_date, range.end_date);

    if exists || !conflicts.is_empty() {
        return Err(WaiverError::DuplicateOrOverlap { key, conflicts });
    }
    Ok(())
}

pub struct WaiverReconciler<B, C> {
    store: WaiverStore<B>,
    calendar: C,
}

impl<B: WaiverBackend, C: WorkdayCalendar> WaiverReconciler<B, C> {
    pub fn new(store: WaiverStore<B>, calendar: C) -> Self {
        Self { store, calendar }
    }

    pub fn store(&self) -> &WaiverStore<B> {
        &self.store
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    pub fn set_calendar(&mut self, calendar: C) {
        self.calendar = calendar;
    }

    /// Validates `candidate` and persists it. The store is written only
    /// after every check passed, so a rejection leaves it unchanged.
    pub async fn add_waiver(&self, candidate: &WaiverCandidate) -> Result<WaiverRecord, WaiverError> {
        let result = self.try_add(candidate).await;
        match &result {
            Ok(record) => log::info!("Added waiver {} ({})", record.key, record.reason),
            Err(e) => log::info!("Rejected waiver [{}]: {}", e.kind(), e),
        }
        result
    }

    async fn try_add(&self, candidate: &WaiverCandidate) -> Result<WaiverRecord, WaiverError> {
        let range = range::validate(
            &candidate.start_date,
            &candidate.end_date,
            &candidate.start_time,
            &candidate.end_time,
        )?;

        check_overlap(&self.store, &range).await?;

        if !has_working_day(&self.calendar, &range) {
            return Err(WaiverError::NoWorkingDayInRange { key: range.key() });
        }

        let record = WaiverRecord::new(range, candidate.reason.clone());
        self.store.set(&record.key, &record).await?;
        Ok(record)
    }

    /// Unknown keys are a committed no-op.
    pub async fn delete_waiver(&self, key: &str) -> Result<(), WaiverError> {
        self.store.delete(key).await?;
        log::info!("Deleted waiver {}", key);
        Ok(())
    }

    pub async fn clear(&self) -> Result<usize, WaiverError> {
        self.store.clear().await
    }
}
