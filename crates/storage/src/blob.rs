use std::sync::Arc;

use cumulo_core::{Blob, BlobInfo, LEASE_DURATION, Lease, MovePhase, MoveStep};
use cumulo_remote::{DynRemoteStore, RemoteError};
use tracing::{debug, info, instrument};

use crate::config::ContainerConfig;
use crate::error::StorageError;

/// Lease-governed operations on the blobs of one container.
///
/// Bound at construction to a [`ContainerConfig`] and a shared remote
/// client. Every call is single-shot: no client-side locking, caching, or
/// retrying; concurrent callers are arbitrated solely by the remote
/// service's leases.
pub struct BlobOperations {
    config: ContainerConfig,
    client: Arc<dyn DynRemoteStore>,
}

impl std::fmt::Debug for BlobOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobOperations")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.trim().is_empty() {
        return Err(StorageError::invalid_argument("blob name is missing"));
    }
    Ok(())
}

fn validate_lease(lease: &Lease, name: &str) -> Result<(), StorageError> {
    if lease.token().trim().is_empty() {
        return Err(StorageError::invalid_argument("lease id is missing"));
    }
    if !lease.is_for(name) {
        return Err(StorageError::invalid_argument(format!(
            "lease for blob {held} cannot authorize an operation on blob {name}",
            held = lease.blob_name()
        )));
    }
    Ok(())
}

impl BlobOperations {
    /// Create operations bound to `config` and a shared remote client.
    pub fn new(config: ContainerConfig, client: Arc<dyn DynRemoteStore>) -> Self {
        Self { config, client }
    }

    /// The container these operations address.
    pub fn container(&self) -> &str {
        self.config.container()
    }

    /// Whether the blob exists. A missing container reads as `false`.
    #[instrument(name = "blob.exists", skip_all, fields(container = %self.container(), blob = %name))]
    pub async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        validate_name(name)?;
        debug!("checking blob existence");
        let found = self.remote_exists(name).await?;
        debug!(found, "checked blob existence");
        Ok(found)
    }

    /// Upload the blob, creating it or fully overwriting an existing one.
    ///
    /// A lease is required when the target blob is currently leased and must
    /// belong to the blob being uploaded.
    #[instrument(name = "blob.upload", skip_all, fields(container = %self.container(), blob = %blob.name()))]
    pub async fn upload(&self, blob: &Blob, lease: Option<&Lease>) -> Result<(), StorageError> {
        validate_name(blob.name())?;
        if blob.is_empty() {
            return Err(StorageError::invalid_argument("blob content is missing"));
        }
        if blob.content_type().trim().is_empty() {
            return Err(StorageError::invalid_argument("blob content type is missing"));
        }
        if let Some(lease) = lease {
            validate_lease(lease, blob.name())?;
        }

        debug!(size = blob.len(), "uploading blob");
        self.client
            .put_object(
                self.container(),
                blob.name(),
                blob.content().clone(),
                blob.content_type(),
                lease.map(Lease::token),
            )
            .await
            .map_err(|e| {
                StorageError::failure(
                    self.container(),
                    format!("uploading blob {} failed", blob.name()),
                    e,
                )
            })?;
        info!(size = blob.len(), "blob uploaded");
        Ok(())
    }

    /// Download the blob, materializing its content.
    ///
    /// The existence pre-check and the transfer are separate remote calls; a
    /// deletion racing in between surfaces as the transfer's own failure.
    #[instrument(name = "blob.download", skip_all, fields(container = %self.container(), blob = %name))]
    pub async fn download(&self, name: &str) -> Result<Blob, StorageError> {
        validate_name(name)?;
        debug!("downloading blob");
        if !self.remote_exists(name).await? {
            return Err(self.missing_blob(name));
        }
        self.fetch(name, None).await
    }

    /// Download the blob while holding its lease.
    #[instrument(name = "blob.leased_download", skip_all, fields(container = %self.container(), blob = %name, lease = %lease))]
    pub async fn leased_download(&self, name: &str, lease: &Lease) -> Result<Blob, StorageError> {
        validate_name(name)?;
        validate_lease(lease, name)?;
        debug!("downloading blob under lease");
        if !self.remote_exists(name).await? {
            return Err(self.missing_blob(name));
        }
        self.fetch(name, Some(lease.token())).await
    }

    /// Delete the blob. Deleting an absent blob is a no-op.
    #[instrument(name = "blob.delete", skip_all, fields(container = %self.container(), blob = %name))]
    pub async fn delete(&self, name: &str, lease: Option<&Lease>) -> Result<(), StorageError> {
        validate_name(name)?;
        if let Some(lease) = lease {
            validate_lease(lease, name)?;
        }
        debug!("deleting blob");
        self.client
            .delete_object(self.container(), name, lease.map(Lease::token))
            .await
            .map_err(|e| {
                StorageError::failure(self.container(), format!("deleting blob {name} failed"), e)
            })?;
        info!("blob deleted");
        Ok(())
    }

    /// Acquire the blob's exclusive lease for [`LEASE_DURATION`].
    #[instrument(name = "blob.acquire_lease", skip_all, fields(container = %self.container(), blob = %name))]
    pub async fn acquire_lease(&self, name: &str) -> Result<Lease, StorageError> {
        validate_name(name)?;
        debug!("acquiring lease");
        if !self.remote_exists(name).await? {
            return Err(self.missing_blob(name));
        }
        let token = self
            .client
            .acquire_lease(self.container(), name, LEASE_DURATION)
            .await
            .map_err(|e| {
                StorageError::failure(
                    self.container(),
                    format!("acquiring a lease on blob {name} failed"),
                    e,
                )
            })?;
        info!(lease = %token, "lease acquired");
        Ok(Lease::new(name, token))
    }

    /// Release a previously acquired lease.
    #[instrument(name = "blob.release_lease", skip_all, fields(container = %self.container(), blob = %lease.blob_name(), lease = %lease))]
    pub async fn release_lease(&self, lease: &Lease) -> Result<(), StorageError> {
        validate_name(lease.blob_name())?;
        if lease.token().trim().is_empty() {
            return Err(StorageError::invalid_argument("lease id is missing"));
        }
        debug!("releasing lease");
        if !self.remote_exists(lease.blob_name()).await? {
            return Err(self.missing_blob(lease.blob_name()));
        }
        self.client
            .release_lease(self.container(), lease.blob_name(), lease.token())
            .await
            .map_err(|e| {
                StorageError::failure(
                    self.container(),
                    format!("releasing the lease on blob {} failed", lease.blob_name()),
                    e,
                )
            })?;
        info!("lease released");
        Ok(())
    }

    /// Read a snapshot of the blob's current properties.
    #[instrument(name = "blob.info", skip_all, fields(container = %self.container(), blob = %name))]
    pub async fn blob_info(&self, name: &str) -> Result<BlobInfo, StorageError> {
        validate_name(name)?;
        debug!("reading blob properties");
        if !self.remote_exists(name).await? {
            return Err(self.missing_blob(name));
        }
        let props = self
            .client
            .object_properties(self.container(), name)
            .await
            .map_err(|e| {
                StorageError::failure(
                    self.container(),
                    format!("reading properties of blob {name} failed"),
                    e,
                )
            })?;
        debug!(size = props.content_length, "read blob properties");
        Ok(BlobInfo {
            name: name.to_owned(),
            created_on: props.created_on,
            modified_on: props.last_modified,
            size: props.content_length,
            content_type: props.content_type,
        })
    }

    /// Move the blob into `target_container` on the same endpoint.
    ///
    /// The move is stitched from a download, an upload (overwriting any
    /// existing target blob) and a source delete; it is not atomic and is
    /// not rolled back. When the final delete fails the blob exists in both
    /// containers, and the returned error says so.
    #[instrument(name = "blob.move", skip_all, fields(container = %self.container(), blob = %name, target = %target_container))]
    pub async fn move_to(
        &self,
        name: &str,
        target_container: &str,
        source_lease: Option<&Lease>,
        target_lease: Option<&Lease>,
    ) -> Result<(), StorageError> {
        validate_name(name)?;
        if let Some(lease) = source_lease {
            validate_lease(lease, name)?;
        }
        if let Some(lease) = target_lease {
            validate_lease(lease, name)?;
        }
        let target = self.config.with_container(target_container)?;

        let mut phase = MovePhase::Started;
        debug!(phase = %phase, "moving blob");

        if !self.remote_exists(name).await? {
            return Err(self.missing_blob(name));
        }
        let target_exists = self
            .client
            .container_exists(target.container())
            .await
            .map_err(|e| {
                StorageError::failure(
                    target.container(),
                    format!("checking existence of container {} failed", target.container()),
                    e,
                )
            })?;
        if !target_exists {
            return Err(StorageError::failure(
                target.container(),
                format!("container {} does not exist", target.container()),
                RemoteError::ContainerNotFound(target.container().to_owned()),
            ));
        }

        let object = self
            .client
            .get_object(self.container(), name, source_lease.map(Lease::token))
            .await
            .map_err(|e| self.move_failure(name, target.container(), MoveStep::Download, e))?;

        self.client
            .put_object(
                target.container(),
                name,
                object.content,
                &object.content_type,
                target_lease.map(Lease::token),
            )
            .await
            .map_err(|e| self.move_failure(name, target.container(), MoveStep::Upload, e))?;
        phase = MovePhase::Copied;
        debug!(phase = %phase, "blob copied to target");

        self.client
            .delete_object(self.container(), name, source_lease.map(Lease::token))
            .await
            .map_err(|e| self.move_failure(name, target.container(), MoveStep::DeleteSource, e))?;
        phase = MovePhase::SourceDeleted;
        debug!(phase = %phase, "source blob deleted");

        phase = MovePhase::Done;
        info!(phase = %phase, "blob moved");
        Ok(())
    }

    async fn remote_exists(&self, name: &str) -> Result<bool, StorageError> {
        self.client
            .object_exists(self.container(), name)
            .await
            .map_err(|e| {
                StorageError::failure(
                    self.container(),
                    format!("checking existence of blob {name} failed"),
                    e,
                )
            })
    }

    fn missing_blob(&self, name: &str) -> StorageError {
        StorageError::failure(
            self.container(),
            format!("blob {name} does not exist"),
            RemoteError::ObjectNotFound(name.to_owned()),
        )
    }

    async fn fetch(&self, name: &str, lease: Option<&str>) -> Result<Blob, StorageError> {
        let object = self
            .client
            .get_object(self.container(), name, lease)
            .await
            .map_err(|e| {
                StorageError::failure(
                    self.container(),
                    format!("downloading blob {name} failed"),
                    e,
                )
            })?;
        info!(size = object.content.len(), "blob downloaded");
        Ok(Blob::new(name, object.content, object.content_type))
    }

    fn move_failure(
        &self,
        name: &str,
        target_container: &str,
        step: MoveStep,
        cause: RemoteError,
    ) -> StorageError {
        let phase = MovePhase::Failed(step);
        let mut message = format!(
            "moving blob {name} from {source} to {target_container} failed at {step}",
            source = self.container()
        );
        if phase.leaves_duplicate() {
            message.push_str("; the blob may now exist in both containers");
        }
        StorageError::failure(self.container(), message, cause)
    }
}
