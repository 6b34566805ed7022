//! PetStore — the whole pet collection kept as one JSON document in the
//! bucket. Reads load the full document; writes replace it.

use crate::{
    models::pet::PetRecord,
    services::{
        keys::PETS_KEY,
        object_storage::{ObjectStorage, StorageError, WriteCondition},
    },
};
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// How many read-modify-write cycles an append gets before giving up.
const MAX_APPEND_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("pets document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("pets document kept changing; gave up after {attempts} attempts")]
    Conflict { attempts: usize },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A snapshot of the collection and the version token it was read at.
/// `etag` is `None` when the document does not exist yet.
struct Snapshot {
    records: Vec<PetRecord>,
    etag: Option<String>,
}

#[derive(Clone)]
pub struct PetStore {
    storage: Arc<dyn ObjectStorage>,
}

impl PetStore {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Load every record in insertion order.
    ///
    /// A missing document is an empty collection. Any other failure is
    /// returned so callers can tell an outage from a fresh bucket.
    pub async fn load_all(&self) -> StoreResult<Vec<PetRecord>> {
        Ok(self.snapshot().await?.records)
    }

    /// Overwrite the document with `records`, unconditionally.
    ///
    /// Request handlers go through `append`; this is the bulk-replace
    /// primitive for seeding and repair.
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn save_all(&self, records: &[PetRecord]) -> StoreResult<()> {
        self.write(records, WriteCondition::Overwrite).await
    }

    /// Append one record without losing records appended concurrently.
    ///
    /// Each attempt writes conditionally on the version it read; a lost race
    /// reloads and tries again.
    pub async fn append(&self, record: PetRecord) -> StoreResult<()> {
        for attempt in 1..=MAX_APPEND_ATTEMPTS {
            let Snapshot { mut records, etag } = self.snapshot().await?;
            records.push(record.clone());

            let condition = match etag {
                Some(etag) => WriteCondition::IfMatch(etag),
                None => WriteCondition::IfAbsent,
            };

            match self.write(&records, condition).await {
                Ok(()) => {
                    debug!(id = %record.id, attempt, total = records.len(), "appended pet");
                    return Ok(());
                }
                Err(StoreError::Storage(StorageError::PreconditionFailed { .. })) => {
                    warn!(id = %record.id, attempt, "pets document changed underneath append; retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(StoreError::Conflict {
            attempts: MAX_APPEND_ATTEMPTS,
        })
    }

    async fn snapshot(&self) -> StoreResult<Snapshot> {
        match self.storage.get(PETS_KEY).await {
            Ok(obj) => Ok(Snapshot {
                records: serde_json::from_slice(&obj.body)?,
                etag: obj.etag,
            }),
            Err(StorageError::NotFound { .. }) => {
                debug!("no pets document yet; starting empty");
                Ok(Snapshot {
                    records: Vec::new(),
                    etag: None,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, records: &[PetRecord], condition: WriteCondition) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(records)?;
        self.storage
            .put(PETS_KEY, Bytes::from(body), "application/json", condition)
            .await?;
        Ok(())
    }
}
