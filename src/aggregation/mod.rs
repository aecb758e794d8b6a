//! Weekly attendance analytics.
//!
//! Summaries are computed on read from the shift store and never persisted.
//! The engine only reads; a summary computed while a clock-out is in flight
//! may not include that shift's hours yet.

mod weekly;
mod window;

use std::sync::Arc;

use crate::error::EngineResult;
use crate::models::ShiftRecord;
use crate::shift::ShiftStore;

pub use weekly::{HOURS_DECIMAL_PLACES, summarize};
pub use window::{SummaryWindow, WINDOW_DAYS};

/// Read-only access to the records of a summary window.
#[derive(Clone)]
pub struct AggregationEngine {
    store: Arc<dyn ShiftStore>,
}

impl AggregationEngine {
    /// Creates an engine reading from `store`.
    pub fn new(store: Arc<dyn ShiftStore>) -> Self {
        Self { store }
    }

    /// Fetches every record dated within `window`.
    pub async fn records_in(&self, window: SummaryWindow) -> EngineResult<Vec<ShiftRecord>> {
        let mut records = Vec::new();
        for day in window.days() {
            records.extend(self.store.list_by_date(day).await?);
        }
        Ok(records)
    }
}
