//! Namespaced wallet store
//!
//! [`WalletStore`] scopes every operation to one bucket and key prefix and
//! exposes the small key/value contract a wallet host expects. Every call
//! is a direct round-trip to the backend; nothing is cached.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future::try_join_all;

use crate::config::WalletConfig;
use crate::error::Result;
use crate::key::Namespace;
use crate::traits::ObjectStore;
use crate::value::{Entry, WalletValue};

/// Wallet entries stored under a prefix in a shared bucket
#[derive(Clone)]
pub struct WalletStore {
    namespace: Namespace,
    backend: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for WalletStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl WalletStore {
    /// Create a store over an existing backend
    ///
    /// Fails with [`Error::Config`](crate::Error::Config) when the bucket
    /// or prefix is missing.
    pub fn new(config: &WalletConfig, backend: Arc<dyn ObjectStore>) -> Result<Self> {
        let namespace = config.validate()?;
        Ok(Self::with_namespace(namespace, backend))
    }

    /// Create a store for a namespace
    ///
    /// A [`Namespace`] can only be built with a non-empty bucket and prefix.
    pub fn with_namespace(namespace: Namespace, backend: Arc<dyn ObjectStore>) -> Self {
        tracing::debug!(bucket = %namespace.bucket(), prefix = %namespace.prefix(), "opened wallet store");
        Self { namespace, backend }
    }

    /// Bucket this store writes to
    pub fn bucket(&self) -> &str {
        self.namespace.bucket()
    }

    /// Key prefix this store is scoped to
    pub fn prefix(&self) -> &str {
        self.namespace.prefix()
    }

    /// Namespace this store is scoped to
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Object key an entry name is stored under
    pub fn resolve_key(&self, name: &str) -> Result<String> {
        self.namespace.resolve_key(name)
    }

    /// Store an entry with no metadata, replacing any existing value
    pub async fn put(&self, name: &str, value: impl Into<WalletValue>) -> Result<()> {
        self.put_with_metadata(name, value, HashMap::new()).await
    }

    /// Store an entry with user metadata, replacing any existing value
    pub async fn put_with_metadata(
        &self,
        name: &str,
        value: impl Into<WalletValue>,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        let key = self.resolve_key(name)?;
        let value = value.into();
        let content_type = value.content_type();

        tracing::debug!(bucket = %self.bucket(), key = %key, content_type, "put wallet entry");
        self.backend
            .put_object(self.bucket(), &key, value.into_bytes(), content_type, metadata)
            .await
            .inspect_err(|e| tracing::warn!(key = %key, "put failed: {e}"))
    }

    /// Store a dynamically-typed value
    ///
    /// Strings are stored as text and arrays of bytes as binary. Any other
    /// JSON value fails with
    /// [`Error::UnsupportedValueType`](crate::Error::UnsupportedValueType).
    pub async fn put_json(&self, name: &str, value: serde_json::Value) -> Result<()> {
        self.resolve_key(name)?;
        let value = WalletValue::try_from(value)?;
        self.put(name, value).await
    }

    /// Read an entry's value
    ///
    /// Returns text when the object was stored as `text/plain`, bytes
    /// otherwise.
    pub async fn get(&self, name: &str) -> Result<WalletValue> {
        let key = self.resolve_key(name)?;
        tracing::debug!(bucket = %self.bucket(), key = %key, "get wallet entry");

        let object = self.backend.get_object(self.bucket(), &key).await?;
        Ok(WalletValue::from_body(object.body, object.content_type.as_deref()))
    }

    /// Read an entry with its content type and metadata
    pub async fn get_entry(&self, name: &str) -> Result<Entry> {
        let key = self.resolve_key(name)?;
        tracing::debug!(bucket = %self.bucket(), key = %key, "get wallet entry with metadata");

        let object = self.backend.get_object(self.bucket(), &key).await?;
        Ok(Entry {
            name: self.namespace.strip(&key),
            value: WalletValue::from_body(object.body, object.content_type.as_deref()),
            content_type: object.content_type,
            metadata: object.metadata,
        })
    }

    /// Check whether an entry exists
    ///
    /// Only the backend's not-found signal maps to `false`; access and
    /// transport failures are returned as errors.
    pub async fn contains(&self, name: &str) -> Result<bool> {
        let key = self.resolve_key(name)?;
        tracing::debug!(bucket = %self.bucket(), key = %key, "probe wallet entry");

        match self.backend.head_object(self.bucket(), &key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete an entry; absent entries are not an error
    pub async fn remove(&self, name: &str) -> Result<()> {
        let key = self.resolve_key(name)?;
        tracing::debug!(bucket = %self.bucket(), key = %key, "remove wallet entry");

        self.backend.delete_object(self.bucket(), &key).await
    }

    /// Names of all entries under the prefix
    pub async fn list_names(&self) -> Result<Vec<String>> {
        Ok(self
            .owned_keys()
            .await?
            .iter()
            .map(|key| self.namespace.strip(key))
            .collect())
    }

    /// Read every entry under the prefix
    ///
    /// The first failed read aborts the whole operation.
    pub async fn get_all(&self) -> Result<BTreeMap<String, WalletValue>> {
        let keys = self.owned_keys().await?;
        let values = try_join_all(keys.iter().map(|key| self.get(key))).await?;

        Ok(keys
            .iter()
            .map(|key| self.namespace.strip(key))
            .zip(values)
            .collect())
    }

    /// Keys in the bucket that fall under this store's prefix
    ///
    /// The backend is asked to filter by prefix, and the result is filtered
    /// again since the bucket may hold unrelated data.
    async fn owned_keys(&self) -> Result<Vec<String>> {
        let objects = self
            .backend
            .list_objects(self.bucket(), self.prefix())
            .await?;

        let keys: Vec<String> = objects
            .into_iter()
            .map(|object| object.key)
            .filter(|key| self.namespace.owns(key))
            .collect();

        tracing::debug!(bucket = %self.bucket(), prefix = %self.prefix(), count = keys.len(), "listed wallet entries");
        Ok(keys)
    }
}
