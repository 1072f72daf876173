use cumulo_core::BlobError;
use cumulo_remote::RemoteError;
use thiserror::Error;
use tracing::error;

/// Errors returned by blob and container operations.
///
/// Exactly two shapes: input rejected before any remote call was made, or a
/// remote call that failed. The wrapped remote cause is always present on a
/// failure; raw backend error types never cross this boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Input rejected by validation; no remote call was made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A remote operation failed.
    #[error("{message}")]
    Failure {
        /// What was being attempted when the failure occurred.
        message: String,
        /// The container the operation addressed.
        container: String,
        /// The remote cause.
        #[source]
        source: RemoteError,
    },
}

impl StorageError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Log and wrap a remote failure. The single construction site for
    /// [`StorageError::Failure`].
    pub(crate) fn failure(container: &str, message: String, source: RemoteError) -> Self {
        error!(container = %container, code = source.code(), error = %source, "{message}");
        Self::Failure {
            message,
            container: container.to_owned(),
            source,
        }
    }

    /// Whether this is a pre-remote validation failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// The remote cause, when the error wraps a failed remote call.
    pub fn remote_cause(&self) -> Option<&RemoteError> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::Failure { source, .. } => Some(source),
        }
    }

    /// The container the failed operation addressed, when known.
    pub fn container(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::Failure { container, .. } => Some(container),
        }
    }
}

impl From<BlobError> for StorageError {
    fn from(err: BlobError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_has_no_cause() {
        let err = StorageError::invalid_argument("blob name is missing");
        assert!(err.is_invalid_argument());
        assert!(err.remote_cause().is_none());
        assert!(err.container().is_none());
        assert_eq!(err.to_string(), "invalid argument: blob name is missing");
    }

    #[test]
    fn failure_carries_container_and_cause() {
        let err = StorageError::failure(
            "test-container-one",
            "downloading blob a/x.txt failed".to_owned(),
            RemoteError::ObjectNotFound("a/x.txt".to_owned()),
        );
        assert!(!err.is_invalid_argument());
        assert_eq!(err.to_string(), "downloading blob a/x.txt failed");
        assert_eq!(err.container(), Some("test-container-one"));
        assert_eq!(err.remote_cause().unwrap().code(), "ObjectNotFound");
    }

    #[test]
    fn source_chain_exposes_remote_cause() {
        let err = StorageError::failure(
            "test-container-one",
            "uploading blob a/x.txt failed".to_owned(),
            RemoteError::LeaseIdMissing,
        );
        let source = std::error::Error::source(&err).expect("failure should carry a source");
        assert_eq!(
            source.to_string(),
            "the object is leased and no lease was supplied"
        );
    }

    #[test]
    fn blob_error_converts_to_invalid_argument() {
        let err: StorageError = BlobError::from(std::io::Error::other("boom")).into();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("could not be read"));
    }
}
