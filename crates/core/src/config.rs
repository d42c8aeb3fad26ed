//! Wallet configuration
//!
//! A wallet is configured with the bucket it stores entries in, the key
//! prefix scoping it inside that bucket, and optional connection options
//! handed to the storage client. Configuration can be built in code or
//! loaded from a TOML or JSON document supplied by the host.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::key::Namespace;

/// Default region used when none is configured
const DEFAULT_REGION: &str = "us-east-1";

/// Wallet construction parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Bucket holding the wallet entries (required)
    #[serde(default, alias = "bucketName", skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,

    /// Key prefix scoping this wallet inside the bucket (required)
    #[serde(default, alias = "namePrefix", skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,

    /// Options passed through to the storage client
    #[serde(default, alias = "backendOptions", skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendOptions>,
}

impl WalletConfig {
    /// Create a configuration with the required fields
    pub fn new(bucket_name: impl Into<String>, name_prefix: impl Into<String>) -> Self {
        Self {
            bucket_name: Some(bucket_name.into()),
            name_prefix: Some(name_prefix.into()),
            backend: None,
        }
    }

    /// Set the storage client options
    pub fn with_backend(mut self, backend: BackendOptions) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Check required fields and return the namespace they describe
    pub fn validate(&self) -> Result<Namespace> {
        Namespace::new(
            self.bucket_name.clone().unwrap_or_default(),
            self.name_prefix.clone().unwrap_or_default(),
        )
    }

    /// Effective storage client options
    ///
    /// Falls back to the baseline client configuration when none were given.
    pub fn backend_options(&self) -> BackendOptions {
        self.backend.clone().unwrap_or_default()
    }

    /// Parse a configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a configuration file
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }
}

/// Connection options for the storage client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendOptions {
    /// Endpoint URL override for S3-compatible servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Region
    #[serde(default = "default_region")]
    pub region: String,

    /// Access key ID
    #[serde(default, alias = "accessKeyId", skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Secret access key
    #[serde(default, alias = "secretAccessKey", skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Session token for temporary credentials
    #[serde(default, alias = "sessionToken", skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,

    /// Use path-style bucket addressing
    #[serde(default = "default_true", alias = "forcePathStyle")]
    pub force_path_style: bool,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: default_region(),
            access_key: None,
            secret_key: None,
            session_token: None,
            force_path_style: true,
        }
    }
}

impl BackendOptions {
    /// Options for an S3-compatible endpoint with static credentials
    pub fn with_static_credentials(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            access_key: Some(access_key.into()),
            secret_key: Some(secret_key.into()),
            ..Default::default()
        }
    }

    /// Static credentials, if configured
    ///
    /// Returns `None` when neither key is set, in which case the client
    /// resolves credentials from its default provider chain.
    pub fn static_credentials(&self) -> Result<Option<(&str, &str)>> {
        match (self.access_key.as_deref(), self.secret_key.as_deref()) {
            (Some(access), Some(secret)) => Ok(Some((access, secret))),
            (None, None) => Ok(None),
            _ => Err(Error::Config(
                "access_key and secret_key must be set together".into(),
            )),
        }
    }

    /// Check the options for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint)?;
        }
        if self.region.is_empty() {
            return Err(Error::Config("region must not be empty".into()));
        }
        self.static_credentials()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_ok() {
        let config = WalletConfig::new("wallets", "org1");
        let ns = config.validate().unwrap();
        assert_eq!(ns.bucket(), "wallets");
        assert_eq!(ns.prefix(), "org1");
    }

    #[test]
    fn test_validate_missing_bucket() {
        let config = WalletConfig {
            name_prefix: Some("org1".into()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("bucket_name"));
    }

    #[test]
    fn test_validate_missing_prefix() {
        let config = WalletConfig {
            bucket_name: Some("wallets".into()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("name_prefix"));
    }

    #[test]
    fn test_validate_empty_fields() {
        assert!(WalletConfig::new("", "org1").validate().is_err());
        assert!(WalletConfig::new("wallets", "").validate().is_err());
    }

    #[test]
    fn test_default_backend_options() {
        let config = WalletConfig::new("wallets", "org1");
        let options = config.backend_options();
        assert_eq!(options.region, "us-east-1");
        assert!(options.endpoint.is_none());
        assert!(options.force_path_style);
        assert!(options.static_credentials().unwrap().is_none());
    }

    #[test]
    fn test_from_json_camel_case() {
        let config = WalletConfig::from_json_str(
            r#"{
                "bucketName": "wallets",
                "namePrefix": "org1",
                "backendOptions": {
                    "endpoint": "http://localhost:9000",
                    "accessKeyId": "minioadmin",
                    "secretAccessKey": "minioadmin"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.bucket_name.as_deref(), Some("wallets"));
        let options = config.backend_options();
        assert_eq!(options.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(
            options.static_credentials().unwrap(),
            Some(("minioadmin", "minioadmin"))
        );
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = WalletConfig::from_toml_str(
            r#"
            bucket_name = "wallets"
            name_prefix = "org1"

            [backend]
            region = "eu-west-1"
            force_path_style = false
            "#,
        )
        .unwrap();

        let options = config.backend_options();
        assert_eq!(options.region, "eu-west-1");
        assert!(!options.force_path_style);
    }

    #[test]
    fn test_load_by_extension() {
        let temp_dir = TempDir::new().unwrap();

        let toml_path = temp_dir.path().join("wallet.toml");
        std::fs::write(&toml_path, "bucket_name = \"a\"\nname_prefix = \"p\"\n").unwrap();
        let config = WalletConfig::load(&toml_path).unwrap();
        assert_eq!(config.bucket_name.as_deref(), Some("a"));

        let json_path = temp_dir.path().join("wallet.json");
        std::fs::write(&json_path, r#"{"bucketName":"b","namePrefix":"q"}"#).unwrap();
        let config = WalletConfig::load(&json_path).unwrap();
        assert_eq!(config.name_prefix.as_deref(), Some("q"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = WalletConfig::load(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_partial_credentials_rejected() {
        let options = BackendOptions {
            access_key: Some("key".into()),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let options = BackendOptions {
            endpoint: Some("not a url".into()),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(Error::InvalidUrl(_))));
    }
}
