use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::time::Instant;
use uuid::Uuid;

use cumulo_remote::error::RemoteError;
use cumulo_remote::store::{ObjectProperties, RemoteObject, RemoteStore};

/// Internal record of an active lease on one object.
#[derive(Debug, Clone)]
struct LeaseState {
    id: String,
    expires_at: Instant,
}

impl LeaseState {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Internal record of one stored object.
#[derive(Debug, Clone)]
struct StoredObject {
    content: Bytes,
    content_type: String,
    created_on: DateTime<Utc>,
    modified_on: DateTime<Utc>,
    lease: Option<LeaseState>,
}

impl StoredObject {
    /// The active lease, dropping it first if it has lapsed.
    fn live_lease(&mut self) -> Option<&LeaseState> {
        if self.lease.as_ref().is_some_and(LeaseState::is_expired) {
            self.lease = None;
        }
        self.lease.as_ref()
    }

    fn check_write(&mut self, supplied: Option<&str>) -> Result<(), RemoteError> {
        match (supplied, self.live_lease()) {
            (None, None) => Ok(()),
            (None, Some(_)) => Err(RemoteError::LeaseIdMissing),
            (Some(_), None) => Err(RemoteError::LeaseNotPresent),
            (Some(given), Some(active)) if active.id == given => Ok(()),
            (Some(_), Some(_)) => Err(RemoteError::LeaseIdMismatch),
        }
    }

    fn check_read(&mut self, supplied: Option<&str>) -> Result<(), RemoteError> {
        match (supplied, self.live_lease()) {
            (None, _) => Ok(()),
            (Some(_), None) => Err(RemoteError::LeaseNotPresent),
            (Some(given), Some(active)) if active.id == given => Ok(()),
            (Some(_), Some(_)) => Err(RemoteError::LeaseIdMismatch),
        }
    }

    fn acquire(&mut self, duration: Duration) -> Result<String, RemoteError> {
        if self.live_lease().is_some() {
            return Err(RemoteError::LeaseAlreadyPresent);
        }
        let id = Uuid::new_v4().to_string();
        self.lease = Some(LeaseState {
            id: id.clone(),
            expires_at: Instant::now() + duration,
        });
        Ok(id)
    }

    fn release(&mut self, supplied: &str) -> Result<(), RemoteError> {
        match self.live_lease() {
            None => return Err(RemoteError::LeaseNotPresent),
            Some(active) if active.id != supplied => return Err(RemoteError::LeaseIdMismatch),
            Some(_) => {}
        }
        self.lease = None;
        Ok(())
    }
}

/// In-memory [`RemoteStore`] backed by [`DashMap`]s.
///
/// Lease expiry is lazy: a lapsed lease is discarded the next time the
/// object is touched. Clones share the same underlying maps, so a clone
/// sees everything stored through the original.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemoteStore {
    containers: Arc<DashMap<String, ()>>,
    objects: Arc<DashMap<(String, String), StoredObject>>,
}

impl MemoryRemoteStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn require_container(&self, container: &str) -> Result<(), RemoteError> {
        if self.containers.contains_key(container) {
            Ok(())
        } else {
            Err(RemoteError::ContainerNotFound(container.to_owned()))
        }
    }

    fn key(container: &str, name: &str) -> (String, String) {
        (container.to_owned(), name.to_owned())
    }
}

impl RemoteStore for MemoryRemoteStore {
    async fn object_exists(&self, container: &str, name: &str) -> Result<bool, RemoteError> {
        if !self.containers.contains_key(container) {
            return Ok(false);
        }
        Ok(self.objects.contains_key(&Self::key(container, name)))
    }

    async fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Bytes,
        content_type: &str,
        lease: Option<&str>,
    ) -> Result<(), RemoteError> {
        self.require_container(container)?;
        match self.objects.entry(Self::key(container, name)) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                let object = occupied.get_mut();
                object.check_write(lease)?;
                object.content = content;
                object.content_type = content_type.to_owned();
                object.modified_on = Utc::now();
                Ok(())
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                if lease.is_some() {
                    return Err(RemoteError::LeaseNotPresent);
                }
                let now = Utc::now();
                vacant.insert(StoredObject {
                    content,
                    content_type: content_type.to_owned(),
                    created_on: now,
                    modified_on: now,
                    lease: None,
                });
                Ok(())
            }
        }
    }

    async fn get_object(
        &self,
        container: &str,
        name: &str,
        lease: Option<&str>,
    ) -> Result<RemoteObject, RemoteError> {
        self.require_container(container)?;
        let mut object = self
            .objects
            .get_mut(&Self::key(container, name))
            .ok_or_else(|| RemoteError::ObjectNotFound(name.to_owned()))?;
        object.check_read(lease)?;
        Ok(RemoteObject {
            content: object.content.clone(),
            content_type: object.content_type.clone(),
        })
    }

    async fn delete_object(
        &self,
        container: &str,
        name: &str,
        lease: Option<&str>,
    ) -> Result<(), RemoteError> {
        self.require_container(container)?;
        match self.objects.entry(Self::key(container, name)) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                occupied.get_mut().check_write(lease)?;
                occupied.remove();
                Ok(())
            }
            // Deleting an absent object is a no-op.
            dashmap::mapref::entry::Entry::Vacant(_) => Ok(()),
        }
    }

    async fn acquire_lease(
        &self,
        container: &str,
        name: &str,
        duration: Duration,
    ) -> Result<String, RemoteError> {
        self.require_container(container)?;
        let mut object = self
            .objects
            .get_mut(&Self::key(container, name))
            .ok_or_else(|| RemoteError::ObjectNotFound(name.to_owned()))?;
        object.acquire(duration)
    }

    async fn release_lease(
        &self,
        container: &str,
        name: &str,
        lease: &str,
    ) -> Result<(), RemoteError> {
        self.require_container(container)?;
        let mut object = self
            .objects
            .get_mut(&Self::key(container, name))
            .ok_or_else(|| RemoteError::ObjectNotFound(name.to_owned()))?;
        object.release(lease)
    }

    async fn object_properties(
        &self,
        container: &str,
        name: &str,
    ) -> Result<ObjectProperties, RemoteError> {
        self.require_container(container)?;
        let object = self
            .objects
            .get(&Self::key(container, name))
            .ok_or_else(|| RemoteError::ObjectNotFound(name.to_owned()))?;
        Ok(ObjectProperties {
            created_on: object.created_on,
            last_modified: object.modified_on,
            content_length: object.content.len() as u64,
            content_type: object.content_type.clone(),
        })
    }

    async fn container_exists(&self, container: &str) -> Result<bool, RemoteError> {
        Ok(self.containers.contains_key(container))
    }

    async fn create_container(&self, container: &str) -> Result<(), RemoteError> {
        self.containers.entry(container.to_owned()).or_default();
        Ok(())
    }

    async fn list_objects(
        &self,
        container: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<String>, RemoteError> {
        self.require_container(container)?;
        let mut names: Vec<String> = self
            .objects
            .iter()
            .filter(|entry| {
                let (object_container, name) = entry.key();
                object_container == container && prefix.is_none_or(|p| name.starts_with(p))
            })
            .map(|entry| entry.key().1.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}
