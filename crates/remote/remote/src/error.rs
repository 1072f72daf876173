use thiserror::Error;

/// Errors surfaced by a remote object store.
///
/// Implementations translate their service's failures into these variants so
/// that callers can tell the interesting cases apart -- in particular the
/// lease arbitration outcomes, which drive the optimistic concurrency model.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The object does not exist.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// The container does not exist.
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// A lease acquisition found a lease already in place.
    #[error("a lease is already present on the object")]
    LeaseAlreadyPresent,

    /// A write was attempted without a lease while the object is leased.
    #[error("the object is leased and no lease was supplied")]
    LeaseIdMissing,

    /// The supplied lease does not match the active lease.
    #[error("the supplied lease does not match the active lease")]
    LeaseIdMismatch,

    /// A lease was supplied but the object holds no active lease.
    #[error("no lease is active on the object")]
    LeaseNotPresent,

    /// A network or transport problem reaching the service.
    #[error("connection error: {0}")]
    Connection(String),

    /// The request did not complete within the service's time budget.
    #[error("request timed out")]
    Timeout,

    /// The service rejected the caller's credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Any other service-side failure.
    #[error("service error: {0}")]
    Service(String),
}

impl RemoteError {
    /// Stable, provider-style error code for this variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ObjectNotFound(_) => "ObjectNotFound",
            Self::ContainerNotFound(_) => "ContainerNotFound",
            Self::LeaseAlreadyPresent => "LeaseAlreadyPresent",
            Self::LeaseIdMissing => "LeaseIdMissing",
            Self::LeaseIdMismatch => "LeaseIdMismatch",
            Self::LeaseNotPresent => "LeaseNotPresent",
            Self::Connection(_) => "Connection",
            Self::Timeout => "Timeout",
            Self::Auth(_) => "Auth",
            Self::Service(_) => "Service",
        }
    }

    /// Returns `true` if the error is transient and the operation may
    /// succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }

    /// Returns `true` for any of the lease arbitration failures.
    pub fn is_lease_conflict(&self) -> bool {
        matches!(
            self,
            Self::LeaseAlreadyPresent
                | Self::LeaseIdMissing
                | Self::LeaseIdMismatch
                | Self::LeaseNotPresent
        )
    }

    /// Returns `true` when the object or container does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound(_) | Self::ContainerNotFound(_))
    }
}
