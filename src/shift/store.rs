//! Durable record of shift events.
//!
//! [`ShiftStore`] is the persistence contract the engine writes through.
//! [`InMemoryShiftStore`] is the process-local implementation used by the
//! server binary and the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::{ClockOut, ShiftRecord};

use super::state_machine::{validate_completion, validate_new_record};

/// Persistence contract for shift records.
///
/// Implementations must make a completed write visible to every read issued
/// after it returns.
#[async_trait]
pub trait ShiftStore: Send + Sync {
    /// Appends a new shift record.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateOpenShift` if `record` is open and the worker
    /// already has an open shift.
    async fn append(&self, record: ShiftRecord) -> EngineResult<ShiftRecord>;

    /// Completes the worker's open shift with the given clock-out.
    ///
    /// # Errors
    ///
    /// Returns `NotClockedIn` if the worker has no open shift, or
    /// `InvalidTimestamp` if the clock-out is not after the clock-in.
    async fn complete_open_shift(
        &self,
        worker_id: &str,
        clock_out: ClockOut,
    ) -> EngineResult<ShiftRecord>;

    /// Returns the worker's open shift, if any.
    async fn open_shift(&self, worker_id: &str) -> EngineResult<Option<ShiftRecord>>;

    /// Returns all of a worker's shifts, most recent clock-in first.
    async fn list_by_worker(&self, worker_id: &str) -> EngineResult<Vec<ShiftRecord>>;

    /// Returns all shifts dated `date`, earliest clock-in first.
    async fn list_by_date(&self, date: NaiveDate) -> EngineResult<Vec<ShiftRecord>>;
}

#[derive(Debug, Default)]
struct StoreInner {
    records: Vec<ShiftRecord>,
    /// worker id -> index of the worker's open record in `records`
    open_by_worker: HashMap<String, usize>,
}

/// An in-process [`ShiftStore`].
#[derive(Debug, Default)]
pub struct InMemoryShiftStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryShiftStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Returns true if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

#[async_trait]
impl ShiftStore for InMemoryShiftStore {
    async fn append(&self, record: ShiftRecord) -> EngineResult<ShiftRecord> {
        validate_new_record(&record)?;

        let mut inner = self.inner.write().await;
        if record.is_open() {
            if inner.open_by_worker.contains_key(&record.worker_id) {
                return Err(EngineError::DuplicateOpenShift {
                    worker_id: record.worker_id,
                });
            }
            let index = inner.records.len();
            inner.open_by_worker.insert(record.worker_id.clone(), index);
        }
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn complete_open_shift(
        &self,
        worker_id: &str,
        clock_out: ClockOut,
    ) -> EngineResult<ShiftRecord> {
        let mut inner = self.inner.write().await;
        let Some(&index) = inner.open_by_worker.get(worker_id) else {
            return Err(EngineError::NotClockedIn {
                worker_id: worker_id.to_string(),
            });
        };

        validate_completion(&inner.records[index], &clock_out)?;

        inner.records[index].clock_out = Some(clock_out);
        inner.open_by_worker.remove(worker_id);
        Ok(inner.records[index].clone())
    }

    async fn open_shift(&self, worker_id: &str) -> EngineResult<Option<ShiftRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .open_by_worker
            .get(worker_id)
            .map(|&index| inner.records[index].clone()))
    }

    async fn list_by_worker(&self, worker_id: &str) -> EngineResult<Vec<ShiftRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<ShiftRecord> = inner
            .records
            .iter()
            .filter(|r| r.worker_id == worker_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.clock_in_time.cmp(&a.clock_in_time));
        Ok(records)
    }

    async fn list_by_date(&self, date: NaiveDate) -> EngineResult<Vec<ShiftRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<ShiftRecord> = inner
            .records
            .iter()
            .filter(|r| r.date == date)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.clock_in_time.cmp(&b.clock_in_time));
        Ok(records)
    }
}
