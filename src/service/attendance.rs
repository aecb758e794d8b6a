//! The attendance façade.
//!
//! [`AttendanceService`] is the single entry point for clock events, history,
//! summaries and perimeter management. It never trusts client-supplied
//! state: every clock event re-reads the worker's open shift from the store
//! while holding that worker's lock, and is checked against the perimeter
//! active at that moment.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::aggregation::{AggregationEngine, SummaryWindow, summarize};
use crate::error::{EngineError, EngineResult, ErrorKind};
use crate::geo::{Coordinate, Perimeter, PerimeterRegistry, PerimeterVersion};
use crate::models::{Role, ShiftRecord, WeeklySummary, Worker};
use crate::shift::state_machine::{self, ClockEvent, ShiftState};
use crate::shift::{ShiftStore, WorkerLocks};

use super::{Caller, Clock, WorkerDirectory};

/// Timeouts and retry policy for collaborator calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Upper bound on each store call.
    pub store_timeout: Duration,
    /// Upper bound on waiting for a worker's lock.
    pub lock_timeout: Duration,
    /// Pause before the single retry of a failed read.
    pub read_retry_backoff: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(2_000),
            lock_timeout: Duration::from_millis(2_000),
            read_retry_backoff: Duration::from_millis(100),
        }
    }
}

/// Coordinates the geofence, the state machine, the store and aggregation.
pub struct AttendanceService {
    store: Arc<dyn ShiftStore>,
    directory: Arc<dyn WorkerDirectory>,
    aggregation: AggregationEngine,
    perimeters: PerimeterRegistry,
    locks: WorkerLocks,
    clock: Arc<dyn Clock>,
    settings: ServiceSettings,
}

impl AttendanceService {
    /// Creates a service with `initial_perimeter` installed as version 1.
    pub fn new(
        store: Arc<dyn ShiftStore>,
        directory: Arc<dyn WorkerDirectory>,
        initial_perimeter: Perimeter,
        clock: Arc<dyn Clock>,
        settings: ServiceSettings,
    ) -> Self {
        let perimeters = PerimeterRegistry::new(initial_perimeter, clock.now());
        Self {
            aggregation: AggregationEngine::new(Arc::clone(&store)),
            store,
            directory,
            perimeters,
            locks: WorkerLocks::new(),
            clock,
            settings,
        }
    }

    /// Clocks a worker in at the current time.
    ///
    /// # Errors
    ///
    /// - `AlreadyClockedIn` if the worker has an open shift
    /// - `InvalidLocation` if the coordinate is malformed
    /// - `OutsidePerimeter` if `location` is outside the active perimeter
    /// - `DuplicateOpenShift` if the store refuses the record
    /// - `Timeout` / `StoreUnavailable` if a collaborator fails
    ///
    /// A failed write is never retried; the caller must resubmit.
    pub async fn clock_in(
        &self,
        worker_id: &str,
        location: Coordinate,
        note: Option<String>,
    ) -> EngineResult<ShiftRecord> {
        let _guard = self
            .locks
            .acquire(worker_id, self.settings.lock_timeout)
            .await?;

        let open = self
            .bounded("open_shift", self.store.open_shift(worker_id))
            .await?;
        let state = ShiftState::from_open_shift(open);
        let perimeter = self.perimeters.current();
        let event = ClockEvent {
            worker_id: worker_id.to_string(),
            location,
            note,
            at: self.clock.now(),
        };

        let record = state_machine::clock_in(&state, &perimeter.perimeter, event)?;
        let stored = self.bounded("append", self.store.append(record)).await?;

        info!(
            worker_id = %stored.worker_id,
            shift_id = %stored.id,
            perimeter_version = perimeter.version,
            "Worker clocked in"
        );
        Ok(stored)
    }

    /// Clocks a worker out of their open shift at the current time.
    ///
    /// # Errors
    ///
    /// - `NotClockedIn` if the worker has no open shift
    /// - `InvalidLocation` if the coordinate is malformed
    /// - `OutsidePerimeter` if `location` is outside the active perimeter
    /// - `InvalidTimestamp` if the current time is not after clock-in
    /// - `Timeout` / `StoreUnavailable` if a collaborator fails
    pub async fn clock_out(
        &self,
        worker_id: &str,
        location: Coordinate,
        note: Option<String>,
    ) -> EngineResult<ShiftRecord> {
        let _guard = self
            .locks
            .acquire(worker_id, self.settings.lock_timeout)
            .await?;

        let open = self
            .bounded("open_shift", self.store.open_shift(worker_id))
            .await?;
        let state = ShiftState::from_open_shift(open);
        let perimeter = self.perimeters.current();
        let event = ClockEvent {
            worker_id: worker_id.to_string(),
            location,
            note,
            at: self.clock.now(),
        };

        let completion = state_machine::clock_out(&state, &perimeter.perimeter, event)?;
        let completed = self
            .bounded(
                "complete_open_shift",
                self.store.complete_open_shift(worker_id, completion),
            )
            .await?;

        info!(
            worker_id = %completed.worker_id,
            shift_id = %completed.id,
            hours = ?completed.worked_hours(),
            perimeter_version = perimeter.version,
            "Worker clocked out"
        );
        Ok(completed)
    }

    /// A worker's shifts, most recent first. Empty if there are none.
    pub async fn history(&self, worker_id: &str) -> EngineResult<Vec<ShiftRecord>> {
        self.read_with_retry("list_by_worker", || self.store.list_by_worker(worker_id))
            .await
    }

    /// Every shift dated today, across workers, earliest clock-in first.
    pub async fn shifts_today(&self) -> EngineResult<Vec<ShiftRecord>> {
        let today = self.clock.now().date();
        self.read_with_retry("list_by_date", || self.store.list_by_date(today))
            .await
    }

    /// Computes the summary for the seven days from `window_start`.
    ///
    /// Without a start date the window is the previous Monday-to-Sunday
    /// week relative to today.
    pub async fn weekly_summary(
        &self,
        window_start: Option<NaiveDate>,
    ) -> EngineResult<WeeklySummary> {
        let window = match window_start {
            Some(start) => SummaryWindow::starting(start)?,
            None => SummaryWindow::previous_week(self.clock.now().date())?,
        };

        let started = Instant::now();
        let records = self
            .read_with_retry("weekly_records", || self.aggregation.records_in(window))
            .await?;
        let names: HashMap<String, String> = self
            .read_with_retry("list_workers", || self.directory.list())
            .await?
            .into_iter()
            .map(|worker| (worker.id, worker.display_name))
            .collect();

        let summary = summarize(&window, &records, &names);
        info!(
            window_start = %window.start(),
            records = records.len(),
            unique_users = summary.unique_users,
            total_week_hours = %summary.total_week_hours,
            audit_flags = summary.audit_flags.len(),
            duration_us = started.elapsed().as_micros(),
            "Weekly summary computed"
        );
        Ok(summary)
    }

    /// The active perimeter version.
    pub fn current_perimeter(&self) -> Arc<PerimeterVersion> {
        self.perimeters.current()
    }

    /// Replaces the active perimeter. Manager only.
    ///
    /// The new perimeter applies to every clock event evaluated after this
    /// call returns; existing records are never re-evaluated.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the caller is not a manager
    /// - `InvalidPerimeter` if the center or radius is invalid
    pub fn set_perimeter(
        &self,
        caller: &Caller,
        center: Coordinate,
        radius_meters: f64,
    ) -> EngineResult<Arc<PerimeterVersion>> {
        caller.require(Role::Manager)?;
        let perimeter = Perimeter::new(center, radius_meters)?;
        Ok(self
            .perimeters
            .replace(perimeter, self.clock.now(), &caller.worker_id))
    }

    /// Registers a worker. Manager only.
    ///
    /// Registration is a write and is not retried.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the caller is not a manager
    /// - `InvalidWorker` if the display name is blank
    /// - `Timeout` if the directory does not answer in time
    pub async fn register_worker(
        &self,
        caller: &Caller,
        display_name: &str,
        role: Role,
    ) -> EngineResult<Worker> {
        caller.require(Role::Manager)?;
        self.bounded("register_worker", self.directory.register(display_name, role))
            .await
    }

    /// All registered workers.
    pub async fn workers(&self) -> EngineResult<Vec<Worker>> {
        self.read_with_retry("list_workers", || self.directory.list())
            .await
    }

    /// Runs `call` under the store timeout.
    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = EngineResult<T>>,
    ) -> EngineResult<T> {
        let limit = self.settings.store_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout {
                operation: operation.to_string(),
                millis: limit.as_millis() as u64,
            }),
        }
    }

    /// Runs an idempotent read, retrying once after a backoff if the
    /// collaborator was unavailable.
    async fn read_with_retry<T, F, Fut>(&self, operation: &str, read: F) -> EngineResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = EngineResult<T>>,
    {
        match self.bounded(operation, read()).await {
            Err(err) if err.kind() == ErrorKind::Unavailable => {
                debug!(operation, error = %err, "Read failed, retrying once");
                tokio::time::sleep(self.settings.read_retry_backoff).await;
                self.bounded(operation, read()).await
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClockOut;
    use crate::service::{InMemoryWorkerDirectory, ManualClock};
    use crate::shift::InMemoryShiftStore;
    use async_trait::async_trait;
    use chrono::{NaiveDateTime, TimeDelta};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn site() -> Coordinate {
        Coordinate::new(0.0, 0.0)
    }

    fn far_away() -> Coordinate {
        Coordinate::new(0.0, 0.002)
    }

    fn fast_settings() -> ServiceSettings {
        ServiceSettings {
            store_timeout: Duration::from_millis(50),
            lock_timeout: Duration::from_millis(500),
            read_retry_backoff: Duration::from_millis(1),
        }
    }

    fn service_with(store: Arc<dyn ShiftStore>, clock: Arc<ManualClock>) -> AttendanceService {
        AttendanceService::new(
            store,
            Arc::new(InMemoryWorkerDirectory::new()),
            Perimeter::new(site(), 100.0).unwrap(),
            clock,
            fast_settings(),
        )
    }

    fn service_at(start: NaiveDateTime) -> (AttendanceService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        let service = service_with(Arc::new(InMemoryShiftStore::new()), Arc::clone(&clock));
        (service, clock)
    }

    /// Fails the first `failures` calls of every operation, then delegates.
    struct FlakyStore {
        inner: InMemoryShiftStore,
        failures: usize,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl FlakyStore {
        fn new(failures: usize) -> Self {
            Self {
                inner: InMemoryShiftStore::new(),
                failures,
                reads: AtomicUsize::new(0),
                writes: AtomicUsize::new(0),
            }
        }

        fn fail_read(&self, operation: &str) -> EngineResult<()> {
            if self.reads.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(EngineError::StoreUnavailable {
                    operation: operation.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(())
        }

        fn fail_write(&self, operation: &str) -> EngineResult<()> {
            if self.writes.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(EngineError::StoreUnavailable {
                    operation: operation.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ShiftStore for FlakyStore {
        async fn append(&self, record: ShiftRecord) -> EngineResult<ShiftRecord> {
            self.fail_write("append")?;
            self.inner.append(record).await
        }

        async fn complete_open_shift(
            &self,
            worker_id: &str,
            clock_out: ClockOut,
        ) -> EngineResult<ShiftRecord> {
            self.fail_write("complete_open_shift")?;
            self.inner.complete_open_shift(worker_id, clock_out).await
        }

        async fn open_shift(&self, worker_id: &str) -> EngineResult<Option<ShiftRecord>> {
            self.inner.open_shift(worker_id).await
        }

        async fn list_by_worker(&self, worker_id: &str) -> EngineResult<Vec<ShiftRecord>> {
            self.fail_read("list_by_worker")?;
            self.inner.list_by_worker(worker_id).await
        }

        async fn list_by_date(&self, date: NaiveDate) -> EngineResult<Vec<ShiftRecord>> {
            self.fail_read("list_by_date")?;
            self.inner.list_by_date(date).await
        }
    }

    /// A store whose open-shift lookup never finishes in time.
    struct StalledStore;

    #[async_trait]
    impl ShiftStore for StalledStore {
        async fn append(&self, record: ShiftRecord) -> EngineResult<ShiftRecord> {
            Ok(record)
        }

        async fn complete_open_shift(
            &self,
            worker_id: &str,
            _clock_out: ClockOut,
        ) -> EngineResult<ShiftRecord> {
            Err(EngineError::NotClockedIn {
                worker_id: worker_id.to_string(),
            })
        }

        async fn open_shift(&self, _worker_id: &str) -> EngineResult<Option<ShiftRecord>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn list_by_worker(&self, _worker_id: &str) -> EngineResult<Vec<ShiftRecord>> {
            Ok(Vec::new())
        }

        async fn list_by_date(&self, _date: NaiveDate) -> EngineResult<Vec<ShiftRecord>> {
            Ok(Vec::new())
        }
    }

    /// A directory whose registration never finishes in time.
    struct StalledDirectory;

    #[async_trait]
    impl WorkerDirectory for StalledDirectory {
        async fn register(&self, _display_name: &str, _role: Role) -> EngineResult<Worker> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(EngineError::InvalidWorker {
                message: "unreachable".to_string(),
            })
        }

        async fn list(&self) -> EngineResult<Vec<Worker>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_clock_in_then_out_records_hours() {
        let (service, clock) = service_at(at(2, 9));

        let open = service
            .clock_in("w-001", site(), Some("arrived".to_string()))
            .await
            .unwrap();
        assert!(open.is_open());
        assert_eq!(open.date, at(2, 9).date());

        clock.advance(TimeDelta::hours(8));
        let done = service.clock_out("w-001", site(), None).await.unwrap();
        assert_eq!(done.id, open.id);
        assert_eq!(done.clock_out_time(), Some(at(2, 17)));
        assert_eq!(done.worked_hours(), Some(Decimal::from(8)));
    }

    #[tokio::test]
    async fn test_second_clock_in_is_rejected() {
        let (service, _clock) = service_at(at(2, 9));
        let open = service.clock_in("w-001", site(), None).await.unwrap();

        match service.clock_in("w-001", site(), None).await {
            Err(EngineError::AlreadyClockedIn { shift_id, .. }) => assert_eq!(shift_id, open.id),
            other => panic!("Expected AlreadyClockedIn, got {other:?}"),
        }
        assert_eq!(service.history("w-001").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clock_out_without_open_shift_is_rejected() {
        let (service, _clock) = service_at(at(2, 17));
        assert!(matches!(
            service.clock_out("w-001", site(), None).await,
            Err(EngineError::NotClockedIn { .. })
        ));
    }

    #[tokio::test]
    async fn test_clock_out_at_same_instant_is_rejected_and_shift_stays_open() {
        let (service, _clock) = service_at(at(2, 9));
        service.clock_in("w-001", site(), None).await.unwrap();

        assert!(matches!(
            service.clock_out("w-001", site(), None).await,
            Err(EngineError::InvalidTimestamp { .. })
        ));
        let history = service.history("w-001").await.unwrap();
        assert!(history[0].is_open());
    }

    #[tokio::test]
    async fn test_outside_perimeter_creates_nothing() {
        let (service, _clock) = service_at(at(2, 9));

        match service.clock_in("w-001", far_away(), None).await {
            Err(EngineError::OutsidePerimeter {
                distance_meters,
                radius_meters,
            }) => {
                assert!(distance_meters > 200.0);
                assert_eq!(radius_meters, 100.0);
            }
            other => panic!("Expected OutsidePerimeter, got {other:?}"),
        }
        assert!(service.history("w-001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_clock_ins_leave_one_open_shift() {
        let (service, _clock) = service_at(at(2, 9));
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.clock_in("w-001", site(), None).await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(err) => assert!(matches!(err, EngineError::AlreadyClockedIn { .. })),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(service.history("w-001").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_workers_do_not_block_each_other() {
        let (service, _clock) = service_at(at(2, 9));
        for worker in ["w-001", "w-002", "w-003"] {
            service.clock_in(worker, site(), None).await.unwrap();
        }
        assert_eq!(service.shifts_today().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_set_perimeter_requires_manager() {
        let (service, _clock) = service_at(at(2, 9));
        let caller = Caller::new("w-001", Role::CareWorker);

        assert!(matches!(
            service.set_perimeter(&caller, Coordinate::new(1.0, 1.0), 50.0),
            Err(EngineError::Unauthorized { .. })
        ));
        assert_eq!(service.current_perimeter().version, 1);
    }

    #[tokio::test]
    async fn test_set_perimeter_rejects_invalid_radius() {
        let (service, _clock) = service_at(at(2, 9));
        let manager = Caller::new("m-001", Role::Manager);

        assert!(matches!(
            service.set_perimeter(&manager, site(), 0.0),
            Err(EngineError::InvalidPerimeter { .. })
        ));
        assert_eq!(service.current_perimeter().version, 1);
    }

    #[tokio::test]
    async fn test_new_perimeter_applies_to_later_events_only() {
        let (service, clock) = service_at(at(2, 9));
        let manager = Caller::new("m-001", Role::Manager);
        let open = service.clock_in("w-001", site(), None).await.unwrap();

        let moved = service
            .set_perimeter(&manager, Coordinate::new(10.0, 10.0), 100.0)
            .unwrap();
        assert_eq!(moved.version, 2);
        assert_eq!(moved.updated_by.as_deref(), Some("m-001"));

        // The open shift is untouched, but the old site is now outside.
        clock.advance(TimeDelta::hours(1));
        assert!(matches!(
            service.clock_out("w-001", site(), None).await,
            Err(EngineError::OutsidePerimeter { .. })
        ));
        let done = service
            .clock_out("w-001", Coordinate::new(10.0, 10.0), None)
            .await
            .unwrap();
        assert_eq!(done.id, open.id);
        assert_eq!(done.clock_in_location, site());
    }

    #[tokio::test]
    async fn test_weekly_summary_defaults_to_previous_week() {
        let (service, clock) = service_at(at(2, 9));
        let manager = Caller::new("m-001", Role::Manager);
        let alice = service
            .register_worker(&manager, "Alice", Role::CareWorker)
            .await
            .unwrap();

        service.clock_in(&alice.id, site(), None).await.unwrap();
        clock.advance(TimeDelta::hours(8));
        service.clock_out(&alice.id, site(), None).await.unwrap();

        // Wednesday of the following week.
        clock.set(at(11, 12));
        let summary = service.weekly_summary(None).await.unwrap();

        assert_eq!(summary.period.start, at(2, 0).date());
        assert_eq!(summary.unique_users, 1);
        assert_eq!(summary.hours_for(&alice.id), Decimal::from(8));
        assert_eq!(summary.total_hours_per_worker[0].name, "Alice");
        assert_eq!(summary.average_for(at(2, 0).date()), Decimal::from(8));
    }

    #[tokio::test]
    async fn test_weekly_summary_with_explicit_start() {
        let (service, clock) = service_at(at(9, 9));
        service.clock_in("w-001", site(), None).await.unwrap();
        clock.advance(TimeDelta::hours(4));
        service.clock_out("w-001", site(), None).await.unwrap();

        let summary = service.weekly_summary(Some(at(9, 0).date())).await.unwrap();
        assert_eq!(summary.total_week_hours, Decimal::from(4));
        // Unknown workers are labelled by id.
        assert_eq!(summary.total_hours_per_worker[0].name, "w-001");
    }

    #[tokio::test]
    async fn test_history_retries_once_after_store_failure() {
        let clock = Arc::new(ManualClock::new(at(2, 9)));
        let store = Arc::new(FlakyStore::new(1));
        let service = service_with(store.clone(), clock);

        assert!(service.history("w-001").await.unwrap().is_empty());
        assert_eq!(store.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_read_gives_up_after_one_retry() {
        let clock = Arc::new(ManualClock::new(at(2, 9)));
        let store = Arc::new(FlakyStore::new(2));
        let service = service_with(store.clone(), clock);

        assert!(matches!(
            service.shifts_today().await,
            Err(EngineError::StoreUnavailable { .. })
        ));
        assert_eq!(store.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_write_is_not_retried() {
        let clock = Arc::new(ManualClock::new(at(2, 9)));
        let store = Arc::new(FlakyStore::new(1));
        let service = service_with(store.clone(), clock);

        assert!(matches!(
            service.clock_in("w-001", site(), None).await,
            Err(EngineError::StoreUnavailable { .. })
        ));
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert!(store.inner.is_empty().await);

        // An explicit resubmission succeeds.
        service.clock_in("w-001", site(), None).await.unwrap();
    }

    #[tokio::test]
    async fn test_stalled_store_times_out() {
        let clock = Arc::new(ManualClock::new(at(2, 9)));
        let service = service_with(Arc::new(StalledStore), clock);

        match service.clock_in("w-001", site(), None).await {
            Err(EngineError::Timeout { operation, millis }) => {
                assert_eq!(operation, "open_shift");
                assert_eq!(millis, 50);
            }
            other => panic!("Expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_many_cycles_never_leave_two_open_shifts() {
        let (service, clock) = service_at(at(2, 6));
        for _ in 0..10 {
            service.clock_in("w-001", site(), None).await.unwrap();
            assert!(service.clock_in("w-001", site(), None).await.is_err());
            clock.advance(TimeDelta::minutes(30));
            service.clock_out("w-001", site(), None).await.unwrap();
            clock.advance(TimeDelta::minutes(30));
        }

        let history = service.history("w-001").await.unwrap();
        assert_eq!(history.len(), 10);
        assert!(history.iter().all(|record| !record.is_open()));
    }

    #[tokio::test]
    async fn test_register_worker_requires_manager() {
        let (service, _clock) = service_at(at(2, 9));
        let caller = Caller::new("w-001", Role::CareWorker);

        assert!(matches!(
            service.register_worker(&caller, "Morgan", Role::Manager).await,
            Err(EngineError::Unauthorized { .. })
        ));
        assert!(service.workers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stalled_directory_times_out_registration() {
        let service = AttendanceService::new(
            Arc::new(InMemoryShiftStore::new()),
            Arc::new(StalledDirectory),
            Perimeter::new(site(), 100.0).unwrap(),
            Arc::new(ManualClock::new(at(2, 9))),
            fast_settings(),
        );
        let manager = Caller::new("m-001", Role::Manager);

        match service.register_worker(&manager, "Alice", Role::CareWorker).await {
            Err(EngineError::Timeout { operation, millis }) => {
                assert_eq!(operation, "register_worker");
                assert_eq!(millis, 50);
            }
            other => panic!("Expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_weekly_summary_rejects_window_past_last_date() {
        let (service, _clock) = service_at(at(2, 9));
        let start = NaiveDate::MAX - chrono::Days::new(1);

        assert!(matches!(
            service.weekly_summary(Some(start)).await,
            Err(EngineError::InvalidWindow { .. })
        ));
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        ClockIn(usize),
        ClockOut(usize),
        Advance(i64),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0usize..3).prop_map(Step::ClockIn),
            (0usize..3).prop_map(Step::ClockOut),
            (1i64..600).prop_map(Step::Advance),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_at_most_one_open_shift_per_worker(steps in prop::collection::vec(step(), 1..40)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            runtime.block_on(async {
                let workers = ["w-001", "w-002", "w-003"];
                let (service, clock) = service_at(at(2, 6));
                let mut open = [false; 3];

                for step in steps {
                    // Every event happens strictly after the previous one.
                    clock.advance(TimeDelta::minutes(1));
                    match step {
                        Step::ClockIn(w) => {
                            let result = service.clock_in(workers[w], site(), None).await;
                            assert_eq!(result.is_ok(), !open[w], "clock-in {step:?}: {result:?}");
                            open[w] = true;
                        }
                        Step::ClockOut(w) => {
                            let result = service.clock_out(workers[w], site(), None).await;
                            assert_eq!(result.is_ok(), open[w], "clock-out {step:?}: {result:?}");
                            open[w] = false;
                        }
                        Step::Advance(minutes) => clock.advance(TimeDelta::minutes(minutes)),
                    }

                    for (w, worker) in workers.iter().enumerate() {
                        let history = service.history(worker).await.unwrap();
                        let open_records = history.iter().filter(|r| r.is_open()).count();
                        assert!(open_records <= 1, "{worker} has {open_records} open shifts");
                        assert_eq!(open_records == 1, open[w]);
                    }
                }
            });
        }
    }
}
