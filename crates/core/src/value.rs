//! Entry values and content-type inference
//!
//! A stored value is either UTF-8 text or raw bytes. The variant decides the
//! content type written to the backend, and the content type read back
//! decides which variant `get` returns.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, Result};

/// Content type for text entries
pub const TEXT_PLAIN: &str = "text/plain";

/// Content type for binary entries
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A wallet entry value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WalletValue {
    /// UTF-8 text, stored as `text/plain`
    Text(String),
    /// Raw bytes, stored as `application/octet-stream`
    Binary(Vec<u8>),
}

impl WalletValue {
    /// Content type this value is stored with
    pub const fn content_type(&self) -> &'static str {
        match self {
            WalletValue::Text(_) => TEXT_PLAIN,
            WalletValue::Binary(_) => OCTET_STREAM,
        }
    }

    /// Decode a stored body according to its content type
    ///
    /// Only `text/plain` (optionally with parameters) yields text. A
    /// `text/plain` body that is not valid UTF-8 is returned as bytes.
    pub fn from_body(body: Vec<u8>, content_type: Option<&str>) -> Self {
        if content_type.is_some_and(is_text_plain) {
            match String::from_utf8(body) {
                Ok(text) => WalletValue::Text(text),
                Err(e) => {
                    tracing::warn!("text/plain entry is not valid UTF-8, returning bytes");
                    WalletValue::Binary(e.into_bytes())
                }
            }
        } else {
            WalletValue::Binary(body)
        }
    }

    /// Body bytes as written to the backend
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            WalletValue::Text(text) => text.into_bytes(),
            WalletValue::Binary(bytes) => bytes,
        }
    }

    /// Borrow the text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WalletValue::Text(text) => Some(text),
            WalletValue::Binary(_) => None,
        }
    }

    /// Borrow the bytes, if this is a binary value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            WalletValue::Text(_) => None,
            WalletValue::Binary(bytes) => Some(bytes),
        }
    }
}

fn is_text_plain(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(TEXT_PLAIN))
}

impl From<String> for WalletValue {
    fn from(value: String) -> Self {
        WalletValue::Text(value)
    }
}

impl From<&str> for WalletValue {
    fn from(value: &str) -> Self {
        WalletValue::Text(value.to_string())
    }
}

impl From<Vec<u8>> for WalletValue {
    fn from(value: Vec<u8>) -> Self {
        WalletValue::Binary(value)
    }
}

impl From<&[u8]> for WalletValue {
    fn from(value: &[u8]) -> Self {
        WalletValue::Binary(value.to_vec())
    }
}

impl TryFrom<serde_json::Value> for WalletValue {
    type Error = Error;

    /// Strings become text, arrays of byte-sized integers become bytes.
    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(text) => Ok(WalletValue::Text(text)),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(Error::unsupported_value)
                })
                .collect::<Result<Vec<u8>>>()
                .map(WalletValue::Binary),
            _ => Err(Error::unsupported_value()),
        }
    }
}

/// Infer the content type of a dynamically-typed value
pub fn determine_type(value: &serde_json::Value) -> Result<&'static str> {
    WalletValue::try_from(value.clone()).map(|v| v.content_type())
}

/// A fully-read wallet entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Bare entry name (prefix stripped)
    pub name: String,
    /// Decoded value
    pub value: WalletValue,
    /// Content type reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// User metadata stored alongside the entry
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}
