//! Integration tests for the S3 wallet backend
//!
//! These tests require a running S3-compatible server.
//!
//! Run with:
//! ```bash
//! # Start RustFS container
//! docker run -d --name rustfs -p 9000:9000 -p 9001:9001 \
//!     -v rustfs-data:/data \
//!     -e RUSTFS_ACCESS_KEY=accesskey \
//!     -e RUSTFS_SECRET_KEY=secretkey \
//!     rustfs/rustfs:1.0.0-alpha.81
//!
//! # Run tests
//! TEST_S3_ENDPOINT=http://localhost:9000 \
//! TEST_S3_ACCESS_KEY=accesskey \
//! TEST_S3_SECRET_KEY=secretkey \
//!     cargo test -p wallet-s3 --features integration
//! ```

#![cfg(feature = "integration")]

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use wallet_core::{BackendOptions, Error, WalletConfig, WalletStore, WalletValue};
use wallet_s3::{S3Backend, open_wallet};

/// Get S3 test configuration from environment
fn get_test_options() -> Option<BackendOptions> {
    let endpoint = std::env::var("TEST_S3_ENDPOINT").ok()?;
    let access_key = std::env::var("TEST_S3_ACCESS_KEY").ok()?;
    let secret_key = std::env::var("TEST_S3_SECRET_KEY").ok()?;
    Some(BackendOptions::with_static_credentials(
        endpoint, access_key, secret_key,
    ))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{nanos:x}")
}

/// Test helper: create a fresh bucket and open a wallet in it
async fn setup_wallet(name: &str, prefix: &str) -> anyhow::Result<Option<WalletStore>> {
    init_tracing();
    let Some(options) = get_test_options() else {
        eprintln!("Skipping: TEST_S3_* environment variables not set");
        return Ok(None);
    };

    let bucket = format!("test-{name}-{}", unique_suffix());
    let backend = S3Backend::new(&options).await?;
    backend.inner().create_bucket().bucket(&bucket).send().await?;

    let config = WalletConfig::new(bucket, prefix).with_backend(options);
    Ok(Some(open_wallet(&config).await?))
}

#[tokio::test]
async fn test_text_and_binary_round_trip() -> anyhow::Result<()> {
    let Some(wallet) = setup_wallet("roundtrip", "org1").await? else {
        return Ok(());
    };

    wallet.put("text", "hello").await?;
    wallet.put("bytes", vec![1u8, 2, 3]).await?;

    assert_eq!(wallet.get("text").await?, WalletValue::Text("hello".into()));
    assert_eq!(wallet.get("bytes").await?, WalletValue::Binary(vec![1, 2, 3]));
    Ok(())
}

#[tokio::test]
async fn test_metadata_round_trip() -> anyhow::Result<()> {
    let Some(wallet) = setup_wallet("metadata", "org1").await? else {
        return Ok(());
    };

    let metadata = HashMap::from([("kind".to_string(), "x509".to_string())]);
    wallet.put_with_metadata("alice", "cert", metadata).await?;

    let entry = wallet.get_entry("alice").await?;
    assert_eq!(entry.metadata.get("kind").map(String::as_str), Some("x509"));
    Ok(())
}

#[tokio::test]
async fn test_contains_and_remove() -> anyhow::Result<()> {
    let Some(wallet) = setup_wallet("contains", "org1").await? else {
        return Ok(());
    };

    assert!(!wallet.contains("k").await?);
    wallet.put("k", "v").await?;
    assert!(wallet.contains("k").await?);

    wallet.remove("k").await?;
    assert!(!wallet.contains("k").await?);

    // Removing again is a no-op
    wallet.remove("k").await?;
    Ok(())
}

#[tokio::test]
async fn test_get_missing_is_not_found() -> anyhow::Result<()> {
    let Some(wallet) = setup_wallet("missing", "org1").await? else {
        return Ok(());
    };

    let err = wallet.get("absent").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_get_all_scoped_to_prefix() -> anyhow::Result<()> {
    let Some(wallet) = setup_wallet("getall", "org1").await? else {
        return Ok(());
    };

    assert!(wallet.get_all().await?.is_empty());

    // A second wallet sharing the bucket under another prefix
    let Some(options) = get_test_options() else {
        return Ok(());
    };
    let neighbour = open_wallet(
        &WalletConfig::new(wallet.bucket(), "org2").with_backend(options),
    )
    .await?;
    neighbour.put("mallory", "m").await?;

    for i in 0..5 {
        wallet.put(&format!("user{i}"), format!("cert{i}")).await?;
    }

    let all = wallet.get_all().await?;
    assert_eq!(all.len(), 5);
    assert_eq!(all["user3"].as_text(), Some("cert3"));
    assert!(!all.contains_key("mallory"));

    let names = wallet.list_names().await?;
    assert_eq!(names.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_bucket_isolation() -> anyhow::Result<()> {
    let Some(a) = setup_wallet("isolation-a", "wallet").await? else {
        return Ok(());
    };
    let Some(b) = setup_wallet("isolation-b", "wallet").await? else {
        return Ok(());
    };

    a.put("Batman", "Bruce Wayne").await?;
    b.put("Batman", "Terry McGinnis").await?;

    assert_eq!(a.get("Batman").await?.as_text(), Some("Bruce Wayne"));
    assert_eq!(b.get("Batman").await?.as_text(), Some("Terry McGinnis"));
    Ok(())
}
