//! ObjectStore trait definition
//!
//! This trait defines the narrow slice of an object-storage service the
//! wallet needs. It allows the wallet to be decoupled from the specific
//! S3 SDK implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A key returned by a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size: i64,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,
}

impl ObjectSummary {
    /// Create a new ObjectSummary
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
        }
    }
}

/// Object metadata returned by a head request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectHead {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size: i64,

    /// Content type
    pub content_type: Option<String>,

    /// User metadata
    pub metadata: HashMap<String, String>,
}

/// A fully-read object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredObject {
    /// Object body
    pub body: Vec<u8>,

    /// Content type
    pub content_type: Option<String>,

    /// User metadata
    pub metadata: HashMap<String, String>,
}

/// Trait for the object-storage operations the wallet relies on
///
/// Absent keys are reported as [`Error::NotFound`](crate::Error::NotFound)
/// by `head_object` and `get_object`. `delete_object` succeeds for absent
/// keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object in a bucket whose key starts with `prefix`
    ///
    /// An empty prefix lists the whole bucket. Implementations follow
    /// pagination until the listing is exhausted.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>>;

    /// Get object metadata without its body
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectHead>;

    /// Get object content and metadata
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject>;

    /// Write an object, replacing any existing one
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<()>;

    /// Delete an object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
