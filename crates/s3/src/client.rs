//! S3 backend implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from wallet-core.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use wallet_core::{
    BackendOptions, Error, ObjectHead, ObjectStore, ObjectSummary, Result, StoredObject,
};

/// Provider name reported for credentials taken from the wallet config
const STATIC_PROVIDER: &str = "wallet-static-credentials";

/// S3 backend wrapper
pub struct S3Backend {
    inner: aws_sdk_s3::Client,
}

impl std::fmt::Debug for S3Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Backend").finish_non_exhaustive()
    }
}

impl S3Backend {
    /// Create a new S3 backend from connection options
    pub async fn new(options: &BackendOptions) -> Result<Self> {
        options.validate()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(options.region.clone()));

        // Without static keys the SDK's default provider chain applies
        if let Some((access_key, secret_key)) = options.static_credentials()? {
            let credentials = aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                options.session_token.clone(),
                None, // expiry
                STATIC_PROVIDER,
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &options.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(options.force_path_style)
            .build();

        tracing::debug!(
            region = %options.region,
            endpoint = options.endpoint.as_deref().unwrap_or("default"),
            "created S3 client"
        );

        Ok(Self::from_client(aws_sdk_s3::Client::from_conf(s3_config)))
    }

    /// Wrap an already-configured aws-sdk-s3 client
    pub fn from_client(client: aws_sdk_s3::Client) -> Self {
        Self { inner: client }
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

/// How a failed request should surface to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    NotFound,
    Denied,
    Other,
}

/// Classify a failure from its HTTP status and S3 error code
///
/// A missing bucket is a deployment problem, not an absent entry, so it is
/// never reported as not-found.
fn classify(status: Option<u16>, code: Option<&str>) -> Failure {
    match code {
        Some("NoSuchKey" | "NotFound") => Failure::NotFound,
        Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch") => Failure::Denied,
        Some("NoSuchBucket") => Failure::Other,
        _ => match status {
            Some(404) => Failure::NotFound,
            Some(403) => Failure::Denied,
            _ => Failure::Other,
        },
    }
}

/// Map an SDK error onto the wallet error taxonomy
///
/// `typed_not_found` carries the operation's own not-found check, which
/// takes precedence over status and code inspection.
fn map_sdk_error<E>(err: SdkError<E>, target: &str, typed_not_found: bool) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let failure = if typed_not_found {
        Failure::NotFound
    } else {
        classify(status, err.code())
    };

    match failure {
        Failure::NotFound => Error::NotFound(target.to_string()),
        Failure::Denied => Error::Auth(target.to_string()),
        Failure::Other => {
            let message = DisplayErrorContext(&err).to_string();
            tracing::warn!(target_key = target, "S3 request failed: {message}");
            Error::Network(message)
        }
    }
}

#[async_trait]
impl ObjectStore for S3Backend {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let mut items = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.inner.list_objects_v2().bucket(bucket);

            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }

            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| map_sdk_error(e, bucket, false))?;

            for object in response.contents() {
                let key = object.key().unwrap_or_default().to_string();
                let mut summary = ObjectSummary::new(key, object.size().unwrap_or(0));

                if let Some(modified) = object.last_modified() {
                    summary.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
                }

                items.push(summary);
            }

            continuation_token = response.next_continuation_token().map(|s| s.to_string());
            if !response.is_truncated().unwrap_or(false) || continuation_token.is_none() {
                break;
            }
        }

        Ok(items)
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectHead> {
        let response = self
            .inner
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let not_found = e.as_service_error().is_some_and(|se| se.is_not_found());
                map_sdk_error(e, key, not_found)
            })?;

        Ok(ObjectHead {
            key: key.to_string(),
            size: response.content_length().unwrap_or(0),
            content_type: response.content_type().map(|ct| ct.to_string()),
            metadata: response.metadata().cloned().unwrap_or_default(),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let not_found = e.as_service_error().is_some_and(|se| se.is_no_such_key());
                map_sdk_error(e, key, not_found)
            })?;

        let content_type = response.content_type().map(|ct| ct.to_string());
        let metadata = response.metadata().cloned().unwrap_or_default();

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(StoredObject {
            body,
            content_type,
            metadata,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        let body = aws_sdk_s3::primitives::ByteStream::from(body);

        let mut request = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body);

        if !metadata.is_empty() {
            request = request.set_metadata(Some(metadata));
        }

        request
            .send()
            .await
            .map_err(|e| map_sdk_error(e, key, false))?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        // S3 reports success for absent keys; some compatible servers do not
        match self.inner.delete_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(()),
            Err(e) => match map_sdk_error(e, key, false) {
                Error::NotFound(_) => Ok(()),
                err => Err(err),
            },
        }
    }
}
