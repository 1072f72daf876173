use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Duration of every acquired lease.
///
/// Expiry is enforced by the remote service, not locally; when a lease
/// holder crashes, writes to the blob reopen once this window has elapsed.
pub const LEASE_DURATION: Duration = Duration::from_secs(60);

/// An exclusive-write grant on a single blob.
///
/// A lease binds the server-issued token to the blob name it was issued
/// for, so a token can never be replayed against a different object:
/// operations reject a lease whose name does not match their target before
/// any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    blob_name: String,
    token: String,
}

impl Lease {
    /// Bind a server-issued `token` to the blob it was issued for.
    pub fn new(blob_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            blob_name: blob_name.into(),
            token: token.into(),
        }
    }

    /// The blob this lease was issued for.
    pub fn blob_name(&self) -> &str {
        &self.blob_name
    }

    /// The server-issued lease token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether this lease was issued for `blob_name`.
    pub fn is_for(&self, blob_name: &str) -> bool {
        self.blob_name == blob_name
    }
}

impl std::fmt::Display for Lease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token)
    }
}
