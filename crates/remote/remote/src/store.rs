use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// An object fetched from the store: its content and content type.
#[derive(Debug, Clone)]
pub struct RemoteObject {
    /// The raw binary content.
    pub content: Bytes,
    /// MIME content type recorded at upload.
    pub content_type: String,
}

/// Server-side properties of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectProperties {
    /// When the object was created.
    pub created_on: DateTime<Utc>,
    /// When the object was last overwritten.
    pub last_modified: DateTime<Utc>,
    /// Content length in bytes.
    pub content_length: u64,
    /// MIME content type recorded at upload.
    pub content_type: String,
}

/// Strongly-typed remote object-store trait with native `async fn`.
///
/// One store spans a whole storage account: every method takes the container
/// name, which is what lets a single client serve operations that touch two
/// containers (such as a cross-container move).
///
/// This trait is **not** object-safe because it uses native `async` methods
/// (which desugar to opaque `impl Future` return types). If you need dynamic
/// dispatch, use [`DynRemoteStore`] instead -- every `RemoteStore`
/// automatically implements `DynRemoteStore` via a blanket implementation.
///
/// # Lease semantics
///
/// Leases are arbitrated entirely server-side. Mutating methods take an
/// optional lease token and must enforce the conditional-request rules:
///
/// - object leased, no token supplied: [`RemoteError::LeaseIdMissing`]
/// - object leased, wrong token supplied: [`RemoteError::LeaseIdMismatch`]
/// - object not leased, token supplied: [`RemoteError::LeaseNotPresent`]
///
/// Reads are not blocked by a lease held elsewhere; they are only
/// conditioned when the caller supplies a token.
pub trait RemoteStore: Send + Sync {
    /// Whether the object exists. A missing container reads as the object
    /// not existing, never as an error.
    fn object_exists(
        &self,
        container: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<bool, RemoteError>> + Send;

    /// Create the object or fully overwrite an existing one, subject to the
    /// lease rules above.
    fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Bytes,
        content_type: &str,
        lease: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>> + Send;

    /// Fetch the object's content and content type.
    fn get_object(
        &self,
        container: &str,
        name: &str,
        lease: Option<&str>,
    ) -> impl std::future::Future<Output = Result<RemoteObject, RemoteError>> + Send;

    /// Delete the object, subject to the lease rules above. Deleting an
    /// absent object is a no-op, not an error.
    fn delete_object(
        &self,
        container: &str,
        name: &str,
        lease: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>> + Send;

    /// Acquire an exclusive lease on the object for `duration` and return
    /// the server-issued token. Fails with
    /// [`RemoteError::LeaseAlreadyPresent`] while another lease is active.
    fn acquire_lease(
        &self,
        container: &str,
        name: &str,
        duration: Duration,
    ) -> impl std::future::Future<Output = Result<String, RemoteError>> + Send;

    /// Release the lease identified by `lease`.
    fn release_lease(
        &self,
        container: &str,
        name: &str,
        lease: &str,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>> + Send;

    /// Read the object's server-side properties.
    fn object_properties(
        &self,
        container: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<ObjectProperties, RemoteError>> + Send;

    /// Whether the container exists.
    fn container_exists(
        &self,
        container: &str,
    ) -> impl std::future::Future<Output = Result<bool, RemoteError>> + Send;

    /// Create the container if it does not exist yet. Idempotent.
    fn create_container(
        &self,
        container: &str,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>> + Send;

    /// List object names in the container, lexicographically ordered,
    /// optionally restricted to names starting with `prefix`. A prefix that
    /// matches nothing yields an empty list, not an error.
    fn list_objects(
        &self,
        container: &str,
        prefix: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RemoteError>> + Send;
}

/// Object-safe remote-store trait for use behind `Arc<dyn DynRemoteStore>`.
///
/// Uses [`macro@async_trait`] to enable dynamic dispatch of async methods.
/// You generally should not implement this trait directly -- instead
/// implement [`RemoteStore`] and rely on the blanket implementation.
#[async_trait]
pub trait DynRemoteStore: Send + Sync {
    /// Whether the object exists.
    async fn object_exists(&self, container: &str, name: &str) -> Result<bool, RemoteError>;

    /// Create the object or fully overwrite an existing one.
    async fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Bytes,
        content_type: &str,
        lease: Option<&str>,
    ) -> Result<(), RemoteError>;

    /// Fetch the object's content and content type.
    async fn get_object(
        &self,
        container: &str,
        name: &str,
        lease: Option<&str>,
    ) -> Result<RemoteObject, RemoteError>;

    /// Delete the object. Deleting an absent object is a no-op.
    async fn delete_object(
        &self,
        container: &str,
        name: &str,
        lease: Option<&str>,
    ) -> Result<(), RemoteError>;

    /// Acquire an exclusive lease on the object.
    async fn acquire_lease(
        &self,
        container: &str,
        name: &str,
        duration: Duration,
    ) -> Result<String, RemoteError>;

    /// Release the lease identified by `lease`.
    async fn release_lease(
        &self,
        container: &str,
        name: &str,
        lease: &str,
    ) -> Result<(), RemoteError>;

    /// Read the object's server-side properties.
    async fn object_properties(
        &self,
        container: &str,
        name: &str,
    ) -> Result<ObjectProperties, RemoteError>;

    /// Whether the container exists.
    async fn container_exists(&self, container: &str) -> Result<bool, RemoteError>;

    /// Create the container if it does not exist yet. Idempotent.
    async fn create_container(&self, container: &str) -> Result<(), RemoteError>;

    /// List object names, lexicographically ordered, optionally filtered by
    /// prefix.
    async fn list_objects(
        &self,
        container: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<String>, RemoteError>;
}

/// Blanket implementation: any type that implements [`RemoteStore`] also
/// implements [`DynRemoteStore`], bridging the static and dynamic dispatch
/// worlds.
#[async_trait]
impl<T: RemoteStore + Sync> DynRemoteStore for T {
    async fn object_exists(&self, container: &str, name: &str) -> Result<bool, RemoteError> {
        RemoteStore::object_exists(self, container, name).await
    }

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Bytes,
        content_type: &str,
        lease: Option<&str>,
    ) -> Result<(), RemoteError> {
        RemoteStore::put_object(self, container, name, content, content_type, lease).await
    }

    async fn get_object(
        &self,
        container: &str,
        name: &str,
        lease: Option<&str>,
    ) -> Result<RemoteObject, RemoteError> {
        RemoteStore::get_object(self, container, name, lease).await
    }

    async fn delete_object(
        &self,
        container: &str,
        name: &str,
        lease: Option<&str>,
    ) -> Result<(), RemoteError> {
        RemoteStore::delete_object(self, container, name, lease).await
    }

    async fn acquire_lease(
        &self,
        container: &str,
        name: &str,
        duration: Duration,
    ) -> Result<String, RemoteError> {
        RemoteStore::acquire_lease(self, container, name, duration).await
    }

    async fn release_lease(
        &self,
        container: &str,
        name: &str,
        lease: &str,
    ) -> Result<(), RemoteError> {
        RemoteStore::release_lease(self, container, name, lease).await
    }

    async fn object_properties(
        &self,
        container: &str,
        name: &str,
    ) -> Result<ObjectProperties, RemoteError> {
        RemoteStore::object_properties(self, container, name).await
    }

    async fn container_exists(&self, container: &str) -> Result<bool, RemoteError> {
        RemoteStore::container_exists(self, container).await
    }

    async fn create_container(&self, container: &str) -> Result<(), RemoteError> {
        RemoteStore::create_container(self, container).await
    }

    async fn list_objects(
        &self,
        container: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<String>, RemoteError> {
        RemoteStore::list_objects(self, container, prefix).await
    }
}
