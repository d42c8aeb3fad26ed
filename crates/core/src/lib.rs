//! wallet-core: Core library for the S3-backed wallet store
//!
//! This crate provides the core functionality for storing named credential
//! entries in an object store, including:
//! - Wallet configuration and validation
//! - Key namespacing under a prefix in a shared bucket
//! - Text/binary value model with content-type inference
//! - ObjectStore trait for the storage backend
//! - An in-memory backend for tests and embedding
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod config;
pub mod error;
pub mod key;
pub mod memory;
pub mod traits;
pub mod value;
pub mod wallet;

pub use config::{BackendOptions, WalletConfig};
pub use error::{Error, Result};
pub use key::{resolve_key, Namespace};
pub use memory::MemoryObjectStore;
pub use traits::{ObjectHead, ObjectStore, ObjectSummary, StoredObject};
pub use value::{determine_type, Entry, WalletValue, OCTET_STREAM, TEXT_PLAIN};
pub use wallet::WalletStore;
