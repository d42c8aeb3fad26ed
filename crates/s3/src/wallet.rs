//! Wallet construction over S3

use std::sync::Arc;

use wallet_core::{Result, WalletConfig, WalletStore};

use crate::client::S3Backend;

/// Open a wallet backed by S3
///
/// The bucket and prefix are validated before any client is built, so a
/// missing field fails with a configuration error without touching the
/// network. Backend options default to the baseline client configuration.
pub async fn open_wallet(config: &WalletConfig) -> Result<WalletStore> {
    let namespace = config.validate()?;
    let backend = S3Backend::new(&config.backend_options()).await?;
    Ok(WalletStore::with_namespace(namespace, Arc::new(backend)))
}
