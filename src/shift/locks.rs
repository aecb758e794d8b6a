//! Per-worker mutual exclusion for shift transitions.
//!
//! Each worker id maps to its own async mutex, so transitions for one worker
//! are serialized while different workers proceed in parallel. There is no
//! lock shared across workers beyond the brief map lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::error::{EngineError, EngineResult};

/// Held while a worker's transition is in progress.
pub type WorkerGuard = OwnedMutexGuard<()>;

/// A keyed mutex over worker ids.
#[derive(Debug, Default)]
pub struct WorkerLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl WorkerLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, worker_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(locks) => locks,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Drop entries nobody is holding or waiting on.
        if locks.len() > 1024 {
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        Arc::clone(
            locks
                .entry(worker_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }

    /// Acquires the worker's lock, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the lock is not acquired in time.
    pub async fn acquire(&self, worker_id: &str, timeout: Duration) -> EngineResult<WorkerGuard> {
        let lock = self.lock_for(worker_id);
        tokio::time::timeout(timeout, lock.lock_owned())
            .await
            .map_err(|_| EngineError::Timeout {
                operation: format!("worker lock for '{worker_id}'"),
                millis: timeout.as_millis() as u64,
            })
    }
}
