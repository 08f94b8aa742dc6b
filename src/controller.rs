// File: ./src/controller.rs
//! Window controller for the waiver screen.
//!
//! Front-ends (the CLI, or a GUI host) call into this type instead of the
//! reconciler directly, so the displayed tables are re-rendered from the
//! store after every mutation. User actions are serialized by `&mut self`.
use crate::calendar::WorkdayCalendar;
use crate::error::WaiverError;
use crate::form::WaiverForm;
use crate::importer::{HolidayImporter, ImportReport};
use crate::model::{HolidayCandidate, SelectionContext, WaiverRecord};
use crate::presenter::{DisplayRow, HolidayRow, ListPresenter};
use crate::provider::HolidayProvider;
use crate::reconciler::WaiverReconciler;
use crate::store::WaiverBackend;
use chrono::NaiveTime;

pub struct WaiverController<B, C, P> {
    reconciler: WaiverReconciler<B, C>,
    importer: HolidayImporter<P>,
    presenter: ListPresenter,
    pub selection: SelectionContext,
    waiver_rows: Vec<DisplayRow>,
    candidates: Vec<HolidayCandidate>,
    holiday_rows: Vec<HolidayRow>,
}

impl<B, C, P> WaiverController<B, C, P>
where
    B: WaiverBackend,
    C: WorkdayCalendar,
    P: HolidayProvider,
{
    pub fn new(
        reconciler: WaiverReconciler<B, C>,
        importer: HolidayImporter<P>,
        presenter: ListPresenter,
        selection: SelectionContext,
    ) -> Self {
        Self {
            reconciler,
            importer,
            presenter,
            selection,
            waiver_rows: Vec::new(),
            candidates: Vec::new(),
            holiday_rows: Vec::new(),
        }
    }

    pub fn reconciler(&self) -> &WaiverReconciler<B, C> {
        &self.reconciler
    }

    pub fn importer(&self) -> &HolidayImporter<P> {
        &self.importer
    }

    pub fn presenter(&self) -> &ListPresenter {
        &self.presenter
    }

    pub fn waiver_rows(&self) -> &[DisplayRow] {
        &self.waiver_rows
    }

    pub fn holiday_rows(&self) -> &[HolidayRow] {
        &self.holiday_rows
    }

    pub fn candidates(&self) -> &[HolidayCandidate] {
        &self.candidates
    }

    /// Re-reads the store and re-renders the waiver table.
    pub async fn refresh(&mut self) -> Result<&[DisplayRow], WaiverError> {
        let records = self.reconciler.store().list().await?;
        self.waiver_rows = self.presenter.render(&records);
        Ok(&self.waiver_rows)
    }

    pub async fn add(&mut self, form: &WaiverForm) -> Result<WaiverRecord, WaiverError> {
        let record = self.reconciler.add_waiver(&form.candidate()).await?;
        self.refresh().await?;
        Ok(record)
    }

    pub async fn delete(&mut self, key: &str) -> Result<(), WaiverError> {
        self.reconciler.delete_waiver(key).await?;
        self.refresh().await?;
        Ok(())
    }

    /// Deletes every stored waiver.
    pub async fn clear_waivers(&mut self) -> Result<usize, WaiverError> {
        let result = self.reconciler.clear().await;
        // Re-render even after a partial clear.
        self.refresh().await?;
        result
    }

    /// Fetches holidays for the current selection into the holiday table.
    pub async fn load_holidays(&mut self) -> Result<&[HolidayRow], WaiverError> {
        self.candidates = self
            .importer
            .fetch_candidates(&self.selection, &self.reconciler)
            .await?;
        self.holiday_rows = self.presenter.render_holidays(&self.candidates);
        Ok(&self.holiday_rows)
    }

    /// Sets the import toggle of every row dated `id`, so holidays sharing a
    /// date share one toggle. Returns false for an unknown id.
    pub fn set_import(&mut self, id: &str, checked: bool) -> bool {
        let mut found = false;
        for row in self.holiday_rows.iter_mut().filter(|r| r.id == id) {
            row.import_checked = checked;
            found = true;
        }
        found
    }

    pub fn clear_holidays(&mut self) {
        self.candidates.clear();
        self.holiday_rows.clear();
    }

    /// Back to the initial holiday section: no selection, empty table.
    pub fn reset_holiday_info(&mut self) {
        self.selection.reset();
        self.clear_holidays();
    }

    /// Imports every holiday whose toggle is on, then clears the holiday
    /// table and re-renders the waiver table.
    pub async fn import_checked(&mut self, hours: NaiveTime) -> Result<ImportReport, WaiverError> {
        let accepted: Vec<HolidayCandidate> = self
            .candidates
            .iter()
            .filter(|c| {
                let id = c.id();
                self.holiday_rows
                    .iter()
                    .any(|r| r.id == id && r.import_checked)
            })
            .cloned()
            .collect();

        let report = self
            .importer
            .import(&self.reconciler, &accepted, hours)
            .await;
        self.clear_holidays();
        self.refresh().await?;
        Ok(report)
    }
}
