//! Key namespacing
//!
//! Every object this crate touches lives at `prefix/name` inside a bucket
//! that may be shared with unrelated data. A name that already starts with
//! the prefix is treated as fully qualified and used as-is.

use crate::error::{Error, Result};

/// Separator placed between the prefix and an entry name
pub const SEPARATOR: char = '/';

/// A bucket plus the key prefix scoping one wallet inside it
///
/// Both parts are non-empty; the only way to build one is [`Namespace::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    bucket: String,
    prefix: String,
}

impl Namespace {
    /// Create a new Namespace
    ///
    /// Fails with [`Error::Config`] when the bucket or prefix is empty.
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        let prefix = prefix.into();

        if bucket.is_empty() {
            return Err(Error::Config("bucket_name is required".into()));
        }
        if prefix.is_empty() {
            return Err(Error::Config("name_prefix is required".into()));
        }

        Ok(Self { bucket, prefix })
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Key prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve an entry name to the object key it is stored under
    pub fn resolve_key(&self, name: &str) -> Result<String> {
        resolve_key(&self.prefix, name)
    }

    /// Whether a bucket key belongs to this namespace
    ///
    /// This is a plain string prefix test: prefix `org1` also owns keys
    /// written under `org10/`.
    pub fn owns(&self, key: &str) -> bool {
        key.starts_with(&self.prefix)
    }

    /// Name under which a key is reported by listings
    ///
    /// The prefix and one separator are removed when the remainder resolves
    /// back to the same key. Otherwise (no separator after the prefix, or a
    /// remainder that would itself count as qualified) the full key is the
    /// name, so `resolve_key(strip(key)) == key` always holds for owned keys.
    pub fn strip(&self, key: &str) -> String {
        let Some(rest) = key.strip_prefix(&self.prefix) else {
            return key.to_string();
        };

        let bare = if self.prefix.ends_with(SEPARATOR) {
            Some(rest)
        } else {
            rest.strip_prefix(SEPARATOR)
        };

        match bare {
            Some(name) if self.resolve_key(name).is_ok_and(|k| k == key) => name.to_string(),
            _ => key.to_string(),
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.prefix)
    }
}

/// Resolve `name` against `prefix`
///
/// Names already starting with the prefix are returned unchanged, so the
/// result is stable under repeated application.
pub fn resolve_key(prefix: &str, name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(Error::InvalidArgument("name must not be empty".into()));
    }

    if name.starts_with(prefix) {
        return Ok(name.to_string());
    }

    let bare = name.trim_start_matches(SEPARATOR);
    if bare.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "name '{name}' contains no key component"
        )));
    }

    if prefix.ends_with(SEPARATOR) {
        Ok(format!("{prefix}{bare}"))
    } else {
        Ok(format!("{prefix}{SEPARATOR}{bare}"))
    }
}
