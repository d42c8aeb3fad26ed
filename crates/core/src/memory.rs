//! In-memory object store
//!
//! A process-local [`ObjectStore`] with the same observable semantics as an
//! S3 bucket. Used by tests and by hosts embedding a wallet without a
//! remote service.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::traits::{ObjectHead, ObjectStore, ObjectSummary, StoredObject};

type Bucket = BTreeMap<String, StoredObject>;

/// In-memory object store keyed by bucket, then key
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    buckets: RwLock<HashMap<String, Bucket>>,
}

impl MemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects held in a bucket
    pub async fn object_count(&self, bucket: &str) -> usize {
        self.buckets.read().await.get(bucket).map_or(0, BTreeMap::len)
    }
}

/// Object size as reported by S3 (`i64`), saturating on overflow
fn body_size(body: &[u8]) -> i64 {
    i64::try_from(body.len()).unwrap_or(i64::MAX)
}

fn not_found(bucket: &str, key: &str) -> Error {
    Error::NotFound(format!("{bucket}/{key}"))
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let buckets = self.buckets.read().await;
        let Some(objects) = buckets.get(bucket) else {
            return Ok(Vec::new());
        };

        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectSummary::new(key, body_size(&object.body)))
            .collect())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectHead> {
        let buckets = self.buckets.read().await;
        let object = buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .ok_or_else(|| not_found(bucket, key))?;

        Ok(ObjectHead {
            key: key.to_string(),
            size: body_size(&object.body),
            content_type: object.content_type.clone(),
            metadata: object.metadata.clone(),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        let buckets = self.buckets.read().await;
        buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| not_found(bucket, key))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        let object = StoredObject {
            body,
            content_type: Some(content_type.to_string()),
            metadata,
        };

        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), object);

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        if let Some(objects) = self.buckets.write().await.get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }
}
