use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Addressing for one container on one storage account endpoint.
///
/// Both values are validated non-empty at construction and immutable
/// afterwards. The endpoint may embed access credentials, so the `Debug`
/// output redacts it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    endpoint: String,
    container: String,
}

impl std::fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("endpoint", &"[REDACTED]")
            .field("container", &self.container)
            .finish()
    }
}

impl ContainerConfig {
    /// Create a config addressing `container` on `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] if either value is empty or
    /// whitespace.
    pub fn new(
        endpoint: impl Into<String>,
        container: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let endpoint = endpoint.into();
        let container = container.into();
        if endpoint.trim().is_empty() {
            return Err(StorageError::invalid_argument("endpoint is missing"));
        }
        if container.trim().is_empty() {
            return Err(StorageError::invalid_argument("container name is missing"));
        }
        Ok(Self {
            endpoint,
            container,
        })
    }

    /// The storage account endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The container name.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Derive a config for a sibling container on the same endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] if `container` is empty or
    /// whitespace.
    pub fn with_container(&self, container: impl Into<String>) -> Result<Self, StorageError> {
        Self::new(self.endpoint.clone(), container)
    }
}
