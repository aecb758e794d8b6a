//! Shift state and persistence.
//!
//! This module contains the per-worker state machine that decides clock-in
//! and clock-out transitions, the [`ShiftStore`] persistence contract with
//! an in-memory implementation, and the keyed lock used to serialize
//! transitions for a single worker.

mod locks;
pub mod state_machine;
mod store;

pub use locks::{WorkerGuard, WorkerLocks};
pub use state_machine::{ClockEvent, ShiftState};
pub use store::{InMemoryShiftStore, ShiftStore};
