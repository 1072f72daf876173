use std::sync::Arc;

use cumulo_remote::DynRemoteStore;
use tracing::{debug, info, instrument};

use crate::config::ContainerConfig;
use crate::error::StorageError;

/// Operations on one container as a whole.
pub struct ContainerOperations {
    config: ContainerConfig,
    client: Arc<dyn DynRemoteStore>,
}

impl std::fmt::Debug for ContainerOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerOperations")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContainerOperations {
    /// Create operations bound to `config` and a shared remote client.
    pub fn new(config: ContainerConfig, client: Arc<dyn DynRemoteStore>) -> Self {
        Self { config, client }
    }

    /// The container name this handle addresses.
    pub fn name(&self) -> &str {
        self.config.container()
    }

    /// Whether the container exists. A missing container is `false`, never
    /// an error; only transport failures are surfaced.
    #[instrument(name = "container.exists", skip_all, fields(container = %self.name()))]
    pub async fn exists(&self) -> Result<bool, StorageError> {
        debug!("checking container existence");
        let found = self
            .client
            .container_exists(self.name())
            .await
            .map_err(|e| {
                StorageError::failure(
                    self.name(),
                    format!("checking existence of container {} failed", self.name()),
                    e,
                )
            })?;
        debug!(found, "checked container existence");
        Ok(found)
    }

    /// Create the container if it is not already there. Idempotent.
    #[instrument(name = "container.create_if_not_exists", skip_all, fields(container = %self.name()))]
    pub async fn create_if_not_exists(&self) -> Result<(), StorageError> {
        debug!("creating container");
        self.client
            .create_container(self.name())
            .await
            .map_err(|e| {
                StorageError::failure(
                    self.name(),
                    format!("creating container {} failed", self.name()),
                    e,
                )
            })?;
        info!("container present");
        Ok(())
    }

    /// List the names of the blobs in the container, optionally restricted
    /// to those starting with `prefix`.
    ///
    /// The listing is finite, fully materialized and lexicographically
    /// ordered. A prefix that matches nothing yields an empty vec; a missing
    /// container is a failure.
    #[instrument(name = "container.blob_names", skip_all, fields(container = %self.name()))]
    pub async fn blob_names(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        debug!("listing blobs");
        let names = self
            .client
            .list_objects(self.name(), prefix)
            .await
            .map_err(|e| {
                StorageError::failure(
                    self.name(),
                    format!("listing blobs in container {} failed", self.name()),
                    e,
                )
            })?;
        info!(count = names.len(), "listed blobs");
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use cumulo_remote_memory::MemoryRemoteStore;

    use super::*;

    fn ops() -> ContainerOperations {
        let config = ContainerConfig::new("memory://unit-tests", "test-container-one").unwrap();
        ContainerOperations::new(config, Arc::new(MemoryRemoteStore::new()))
    }

    #[test]
    fn name_reports_configured_container() {
        assert_eq!(ops().name(), "test-container-one");
    }

    #[test]
    fn debug_omits_client() {
        let debug = format!("{:?}", ops());
        assert!(debug.contains("ContainerOperations"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn create_then_exists() {
        let ops = ops();
        assert!(!ops.exists().await.unwrap());
        ops.create_if_not_exists().await.unwrap();
        assert!(ops.exists().await.unwrap());
    }
}
