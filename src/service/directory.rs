//! Worker registry.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Role, Worker};

/// Lookup and registration of workers.
///
/// Identity is established upstream; the directory only maps ids to display
/// names and roles.
#[async_trait]
pub trait WorkerDirectory: Send + Sync {
    /// Registers a new worker and assigns an id.
    async fn register(&self, display_name: &str, role: Role) -> EngineResult<Worker>;

    /// All registered workers ordered by id.
    async fn list(&self) -> EngineResult<Vec<Worker>>;
}

/// A [`WorkerDirectory`] held in memory.
#[derive(Debug, Default)]
pub struct InMemoryWorkerDirectory {
    workers: RwLock<BTreeMap<String, Worker>>,
}

impl InMemoryWorkerDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkerDirectory for InMemoryWorkerDirectory {
    async fn register(&self, display_name: &str, role: Role) -> EngineResult<Worker> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(EngineError::InvalidWorker {
                message: "display name must not be blank".to_string(),
            });
        }

        let worker = Worker {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.to_string(),
            role,
        };
        self.workers
            .write()
            .await
            .insert(worker.id.clone(), worker.clone());

        info!(worker_id = %worker.id, role = %worker.role, "Worker registered");
        Ok(worker)
    }

    async fn list(&self) -> EngineResult<Vec<Worker>> {
        Ok(self.workers.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_assigns_unique_ids() {
        let directory = InMemoryWorkerDirectory::new();
        let alice = directory.register("Alice", Role::CareWorker).await.unwrap();
        let bob = directory.register("  Bob ", Role::Manager).await.unwrap();

        assert_ne!(alice.id, bob.id);
        assert_eq!(bob.display_name, "Bob");
        assert_eq!(directory.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let directory = InMemoryWorkerDirectory::new();
        for name in ["Alice", "Bob", "Carol"] {
            directory.register(name, Role::CareWorker).await.unwrap();
        }
        let ids: Vec<String> = directory
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|worker| worker.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let directory = InMemoryWorkerDirectory::new();
        assert!(matches!(
            directory.register("   ", Role::CareWorker).await,
            Err(EngineError::InvalidWorker { .. })
        ));
        assert!(directory.list().await.unwrap().is_empty());
    }
}
