//! The attendance service façade and its collaborators.
//!
//! Identity is established upstream: the service trusts the worker id and
//! role it is handed, but re-checks the single-open-shift and geofence
//! invariants itself on every clock event.

mod attendance;
mod clock;
mod directory;
mod identity;

pub use attendance::{AttendanceService, ServiceSettings};
pub use clock::{Clock, ManualClock, SystemClock};
pub use directory::{InMemoryWorkerDirectory, WorkerDirectory};
pub use identity::Caller;
