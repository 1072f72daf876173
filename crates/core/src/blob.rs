use bytes::{Buf, Bytes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Errors raised while constructing a [`Blob`].
#[derive(Debug, Error)]
pub enum BlobError {
    /// The content source could not be read to completion.
    #[error("blob content could not be read: {0}")]
    Unreadable(#[from] std::io::Error),
}

/// A named piece of binary content together with its MIME type.
///
/// Content is fully materialized at construction and immutable afterwards:
/// [`content`](Self::content) and [`reader`](Self::reader) can be consumed
/// any number of times without touching the original source.
#[derive(Debug, Clone)]
pub struct Blob {
    name: String,
    content: Bytes,
    content_type: String,
}

impl Blob {
    /// Create a blob from already materialized content.
    pub fn new(
        name: impl Into<String>,
        content: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    /// Create a blob by reading `source` to its end.
    ///
    /// Fails without constructing anything if the source cannot be read.
    pub fn from_reader(
        name: impl Into<String>,
        mut source: impl std::io::Read,
        content_type: impl Into<String>,
    ) -> Result<Self, BlobError> {
        let mut content = Vec::new();
        source.read_to_end(&mut content)?;
        Ok(Self::new(name, content, content_type))
    }

    /// Create a blob by reading an async `source` to its end.
    ///
    /// Fails without constructing anything if the source cannot be read.
    pub async fn from_async_reader(
        name: impl Into<String>,
        mut source: impl AsyncRead + Unpin,
        content_type: impl Into<String>,
    ) -> Result<Self, BlobError> {
        let mut content = Vec::new();
        source.read_to_end(&mut content).await?;
        Ok(Self::new(name, content, content_type))
    }

    /// The blob name (its path within a container).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The materialized content.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// The MIME content type (e.g. `"text/plain"`).
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// A fresh cursor over the content, positioned at the start.
    ///
    /// Every call returns a new independent reader.
    pub fn reader(&self) -> bytes::buf::Reader<Bytes> {
        self.content.clone().reader()
    }
}

/// Point-in-time description of a stored object.
///
/// A snapshot is not kept in sync with the remote object; it describes the
/// object as it was when the properties were read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobInfo {
    /// Blob name (path within the container).
    pub name: String,
    /// When the object was created.
    pub created_on: DateTime<Utc>,
    /// When the object was last overwritten.
    pub modified_on: DateTime<Utc>,
    /// Content length in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
}
