use std::sync::Arc;

use cumulo_remote::DynRemoteStore;

use crate::blob::BlobOperations;
use crate::config::ContainerConfig;
use crate::container::ContainerOperations;
use crate::error::StorageError;

/// Builds operation handles over one shared remote client.
///
/// The client is bound once, at construction. Every handle the factory
/// produces shares it, so two handles on different containers of the same
/// account reuse the same connection state.
pub struct StorageFactory {
    client: Arc<dyn DynRemoteStore>,
}

impl std::fmt::Debug for StorageFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageFactory").finish_non_exhaustive()
    }
}

impl StorageFactory {
    /// Create a factory over `client`.
    pub fn new(client: Arc<dyn DynRemoteStore>) -> Self {
        Self { client }
    }

    /// Blob operations for `container` on `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] if either value is empty or
    /// whitespace.
    pub fn blob_operations(
        &self,
        endpoint: impl Into<String>,
        container: impl Into<String>,
    ) -> Result<BlobOperations, StorageError> {
        let config = ContainerConfig::new(endpoint, container)?;
        Ok(BlobOperations::new(config, Arc::clone(&self.client)))
    }

    /// Container operations for `container` on `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] if either value is empty or
    /// whitespace.
    pub fn container_operations(
        &self,
        endpoint: impl Into<String>,
        container: impl Into<String>,
    ) -> Result<ContainerOperations, StorageError> {
        let config = ContainerConfig::new(endpoint, container)?;
        Ok(ContainerOperations::new(config, Arc::clone(&self.client)))
    }
}

#[cfg(test)]
mod tests {
    use cumulo_core::Blob;
    use cumulo_remote_memory::MemoryRemoteStore;

    use super::*;

    const ENDPOINT: &str = "memory://unit-tests";

    fn factory() -> StorageFactory {
        StorageFactory::new(Arc::new(MemoryRemoteStore::new()))
    }

    #[test]
    fn rejects_empty_endpoint() {
        let err = factory().blob_operations("", "files").unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "invalid argument: endpoint is missing");
    }

    #[test]
    fn rejects_blank_container() {
        let err = factory().container_operations(ENDPOINT, "  ").unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(
            err.to_string(),
            "invalid argument: container name is missing"
        );
    }

    #[tokio::test]
    async fn handles_share_the_client() {
        let factory = factory();
        let containers = factory
            .container_operations(ENDPOINT, "test-container-one")
            .unwrap();
        containers.create_if_not_exists().await.unwrap();

        let blobs = factory.blob_operations(ENDPOINT, "test-container-one").unwrap();
        let blob = Blob::new("a/x.txt", "hello", "text/plain");
        blobs.upload(&blob, None).await.unwrap();

        assert_eq!(containers.blob_names(None).await.unwrap(), vec!["a/x.txt"]);
    }

    #[test]
    fn debug_omits_client() {
        let debug = format!("{:?}", factory());
        assert!(debug.contains("StorageFactory"));
    }
}
