//! In-memory `ObjectStorage` used by the test suites, with knobs for
//! injecting the failures the handlers have to tolerate.

use crate::services::object_storage::{
    ObjectStorage, StorageError, StorageResult, StoredObject, WriteCondition,
};
use async_trait::async_trait;
use bytes::Bytes;
use std::{
    collections::{HashMap, HashSet},
    io,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub body: Bytes,
    pub content_type: String,
    pub etag: String,
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, MemoryObject>>,
    version: AtomicUsize,
    sign_calls: AtomicUsize,
    unsignable: Mutex<HashSet<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    pending_conflicts: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, key: &str) -> Option<MemoryObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    /// Make `signed_url` fail for this key.
    pub fn refuse_signing(&self, key: &str) {
        self.unsignable.lock().unwrap().insert(key.to_string());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The next `n` conditional writes fail as if another writer got there first.
    pub fn inject_conflicts(&self, n: usize) {
        self.pending_conflicts.store(n, Ordering::SeqCst);
    }

    fn outage(op: &str) -> StorageError {
        StorageError::backend(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            format!("simulated outage during {op}"),
        ))
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::outage("get"));
        }
        self.object(key)
            .map(|obj| StoredObject {
                body: obj.body,
                etag: Some(obj.etag),
            })
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        condition: WriteCondition,
    ) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::outage("put"));
        }

        let mut objects = self.objects.lock().unwrap();
        if condition != WriteCondition::Overwrite {
            let injected = self
                .pending_conflicts
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            let current = objects.get(key).map(|obj| obj.etag.as_str());
            let holds = match (&condition, current) {
                (WriteCondition::IfMatch(expected), Some(actual)) => expected == actual,
                (WriteCondition::IfAbsent, None) => true,
                _ => false,
            };
            if injected || !holds {
                return Err(StorageError::PreconditionFailed {
                    key: key.to_string(),
                });
            }
        }

        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        objects.insert(
            key.to_string(),
            MemoryObject {
                body,
                content_type: content_type.to_string(),
                etag: format!("\"v{version}\""),
            },
        );
        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> StorageResult<String> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.unsignable.lock().unwrap().contains(key) {
            return Err(Self::outage("presign"));
        }
        Ok(format!(
            "https://bucket.test/{key}?expires={}",
            ttl.as_secs()
        ))
    }
}
