// File: tests/store_safety.rs
// Store failures never leave partial writes, and two writers sharing one
// waiver file see each other's commits.
use anyhow::{Result, anyhow};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use workday_waiver::WaiverError;
use workday_waiver::calendar::PreferencesCalendar;
use workday_waiver::context::TestContext;
use workday_waiver::model::{WaiverCandidate, WaiverRecord};
use workday_waiver::reconciler::WaiverReconciler;
use workday_waiver::store::{FileWaiverBackend, MemoryWaiverBackend, WaiverBackend, WaiverStore};

/// Memory backend whose reads or writes can be made to fail.
#[derive(Default)]
struct FlakyBackend {
    inner: MemoryWaiverBackend,
    fail_reads: AtomicBool,
    refuse_writes: AtomicBool,
    writes: AtomicUsize,
}

impl WaiverBackend for FlakyBackend {
    async fn get_contents(&self) -> Result<Vec<WaiverRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("host bridge closed"));
        }
        self.inner.get_contents().await
    }

    async fn set_waiver(&self, key: &str, record: &WaiverRecord) -> Result<bool> {
        if self.refuse_writes.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_waiver(key, record).await
    }

    async fn has_waiver(&self, key: &str) -> Result<bool> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("host bridge closed"));
        }
        self.inner.has_waiver(key).await
    }

    async fn delete_waiver(&self, key: &str) -> Result<bool> {
        self.inner.delete_waiver(key).await
    }
}

fn day(d: &str) -> WaiverCandidate {
    WaiverCandidate {
        start_date: d.into(),
        end_date: d.into(),
        start_time: "08:00".into(),
        end_time: "08:00".into(),
        reason: String::new(),
    }
}

#[tokio::test]
async fn test_failed_read_blocks_write() {
    let rec = WaiverReconciler::new(
        WaiverStore::new(FlakyBackend::default()),
        PreferencesCalendar::default(),
    );
    rec.store().backend().fail_reads.store(true, Ordering::SeqCst);

    let err = rec.add_waiver(&day("2020-07-16")).await.unwrap_err();
    assert!(matches!(err, WaiverError::StoreUnavailable(_)));
    assert_eq!(rec.store().backend().writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refused_write_is_store_unavailable() {
    let rec = WaiverReconciler::new(
        WaiverStore::new(FlakyBackend::default()),
        PreferencesCalendar::default(),
    );
    rec.store().backend().refuse_writes.store(true, Ordering::SeqCst);

    let err = rec.add_waiver(&day("2020-07-16")).await.unwrap_err();
    assert!(matches!(err, WaiverError::StoreUnavailable(_)));
    assert!(rec.store().list().await.unwrap().is_empty());

    // No automatic retry: the next attempt succeeds only once the host accepts.
    rec.store().backend().refuse_writes.store(false, Ordering::SeqCst);
    rec.add_waiver(&day("2020-07-16")).await.unwrap();
    assert_eq!(rec.store().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejections_do_not_write() {
    let rec = WaiverReconciler::new(
        WaiverStore::new(FlakyBackend::default()),
        PreferencesCalendar::default(),
    );
    rec.add_waiver(&day("2020-07-16")).await.unwrap();

    let mut inverted = day("2020-07-20");
    inverted.end_date = "2020-07-19".into();
    for bad in [day("2020-13-01"), inverted, day("2020-07-16"), day("2020-07-18")] {
        assert!(rec.add_waiver(&bad).await.is_err());
    }
    assert_eq!(rec.store().backend().writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_two_writers_sharing_one_file() {
    let ctx = TestContext::new();
    let window_a = WaiverReconciler::new(
        WaiverStore::new(FileWaiverBackend::new(&ctx).unwrap()),
        PreferencesCalendar::default(),
    );
    let window_b = WaiverReconciler::new(
        WaiverStore::new(FileWaiverBackend::new(&ctx).unwrap()),
        PreferencesCalendar::default(),
    );

    window_a.add_waiver(&day("2020-07-16")).await.unwrap();

    // B scans after A committed, so the overlap is caught.
    let mut week = day("2020-07-13");
    week.end_date = "2020-07-17".into();
    let err = window_b.add_waiver(&week).await.unwrap_err();
    assert!(matches!(err, WaiverError::DuplicateOrOverlap { .. }));

    window_b.add_waiver(&day("2020-07-20")).await.unwrap();
    assert_eq!(window_a.store().list().await.unwrap().len(), 2);
}
