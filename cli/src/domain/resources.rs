//! Persistent resource layout and cloud storage access data.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::domain::error::{CredentialsError, ResourceNameError};

const BUCKET_VARS: &[&str] = &[
    "BEACH_GOOGLE_CLOUD_STORAGE_STORAGE_BUCKET",
    "BEACH_GOOGLE_CLOUD_STORAGE_PUBLIC_BUCKET",
];
const PRIVATE_KEY_VAR: &str = "BEACH_GOOGLE_CLOUD_STORAGE_SERVICE_ACCOUNT_PRIVATE_KEY";

/// Remote command printing the cloud storage variables of an instance.
pub const CREDENTIALS_QUERY: &str = "env | grep BEACH_GOOGLE_CLOUD_STORAGE_";

/// A Beach instance addressed through the SSH jump host of its cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceAddress {
    pub instance: String,
    pub namespace: String,
    pub cluster: Option<String>,
}

impl InstanceAddress {
    /// `beach@<instance>.<namespace>`
    #[must_use]
    pub fn internal_host(&self) -> String {
        format!("beach@{}.{}", self.instance, self.namespace)
    }

    /// Jump host of the instance's cluster, or the global one.
    #[must_use]
    pub fn jump_host(&self) -> String {
        match self.cluster.as_deref().filter(|c| !c.is_empty()) {
            Some(cluster) => format!("beach@ssh.{cluster}.flownative.cloud"),
            None => "beach@ssh.flownative.cloud".to_string(),
        }
    }
}

/// Bucket name and decoded service-account key of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudStorageAccess {
    pub bucket: String,
    pub service_account_key: Vec<u8>,
}

/// Extract bucket and private key from `env` output of an instance.
///
/// # Errors
///
/// Returns a [`CredentialsError`] if the bucket or key is missing or the
/// key is not valid base64.
pub fn parse_cloud_storage_access(output: &str) -> Result<CloudStorageAccess, CredentialsError> {
    let mut bucket = String::new();
    let mut encoded_key = String::new();

    for line in output.lines() {
        let Some((name, value)) = line.trim_end().split_once('=') else {
            continue;
        };
        if BUCKET_VARS.contains(&name) {
            bucket = value.to_string();
        } else if name == PRIVATE_KEY_VAR {
            encoded_key = value.to_string();
        }
    }

    if bucket.is_empty() {
        return Err(CredentialsError::BucketMissing);
    }
    if encoded_key.is_empty() {
        return Err(CredentialsError::PrivateKeyMissing);
    }
    let service_account_key = STANDARD
        .decode(encoded_key.trim())
        .map_err(|_| CredentialsError::PrivateKeyEncoding)?;

    Ok(CloudStorageAccess {
        bucket,
        service_account_key,
    })
}

/// Relative directory of a persistent resource, sharded by its hash.
///
/// `abcdef…` maps to `a/b/c/d`; `prefix/abcdef…` maps to `prefix/a/b/c/d`.
/// The result is always a relative path without `.` or `..` components.
///
/// # Errors
///
/// Returns [`ResourceNameError::TooShort`] if the hash has fewer than four
/// characters and [`ResourceNameError::Unsafe`] if the name has more than one
/// `/`, an empty or dot prefix, or a shard character other than `[A-Za-z0-9]`.
pub fn resource_directory_for_hash(name: &str) -> Result<PathBuf, ResourceNameError> {
    let (prefix, hash) = match name.split_once('/') {
        Some((prefix, hash)) => (Some(prefix), hash),
        None => (None, name),
    };
    let unsafe_prefix = prefix.is_some_and(|prefix| {
        matches!(prefix, "" | "." | "..") || prefix.contains('\\') || hash.contains('/')
    });
    if unsafe_prefix {
        return Err(ResourceNameError::Unsafe);
    }

    let shards: Vec<char> = hash.chars().take(4).collect();
    if shards.len() < 4 {
        return Err(ResourceNameError::TooShort);
    }
    if !shards.iter().all(char::is_ascii_alphanumeric) {
        return Err(ResourceNameError::Unsafe);
    }

    let mut path = PathBuf::new();
    if let Some(prefix) = prefix {
        path.push(prefix);
    }
    for shard in shards {
        path.push(shard.to_string());
    }
    Ok(path)
}
