//! The authenticated caller of a privileged operation.

use crate::error::{EngineError, EngineResult};
use crate::models::Role;

/// A worker id and role as asserted by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// The calling worker.
    pub worker_id: String,
    /// The caller's role.
    pub role: Role,
}

impl Caller {
    /// Creates a caller.
    pub fn new(worker_id: impl Into<String>, role: Role) -> Self {
        Self {
            worker_id: worker_id.into(),
            role,
        }
    }

    /// Fails with `Unauthorized` unless the caller holds `role`.
    pub fn require(&self, role: Role) -> EngineResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(EngineError::Unauthorized {
                worker_id: self.worker_id.clone(),
                required: role,
            })
        }
    }
}
