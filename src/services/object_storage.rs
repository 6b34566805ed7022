//! The object-storage capability the application is built on.
//!
//! Handlers and the pet store only see [`ObjectStorage`]; the S3 client lives
//! behind it in `s3_storage`.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object `{key}` not found")]
    NotFound { key: String },
    #[error("write precondition failed for `{key}`")]
    PreconditionFailed { key: String },
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StorageError::Backend(Box::new(err))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Object body plus the entity tag the store reported for it.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub etag: Option<String>,
}

/// Guard applied to a `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCondition {
    /// Replace whatever is there.
    Overwrite,
    /// Only replace the object if its current entity tag matches.
    IfMatch(String),
    /// Only create the object if no object exists under the key.
    IfAbsent,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fetch an object. A missing key is `StorageError::NotFound`.
    async fn get(&self, key: &str) -> StorageResult<StoredObject>;

    /// Store `body` under `key`. A violated `condition` is
    /// `StorageError::PreconditionFailed`.
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        condition: WriteCondition,
    ) -> StorageResult<()>;

    /// Produce a time-limited URL granting read access to `key`.
    async fn signed_url(&self, key: &str, ttl: Duration) -> StorageResult<String>;
}
