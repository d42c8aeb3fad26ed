//! wallet-s3: S3 SDK adapter for the wallet store
//!
//! This crate provides the implementation of the ObjectStore trait
//! using the aws-sdk-s3 crate. It is the only crate that directly
//! depends on the AWS SDK.

pub mod client;
pub mod wallet;

pub use client::S3Backend;
pub use wallet::open_wallet;
