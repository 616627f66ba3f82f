//! Google Cloud Storage implementation of the `ObjectStore` port.
//!
//! Talks to the JSON API with `reqwest`. Access tokens come from the OAuth2
//! service-account flow: an RS256-signed JWT is exchanged at the key's token
//! endpoint and cached until shortly before it expires.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::application::ports::ObjectStore;
use crate::domain::CloudStorageAccess;

const API_BASE: &str = "https://storage.googleapis.com/storage/v1";
const UPLOAD_BASE: &str = "https://storage.googleapis.com/upload/storage/v1";
const SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ObjectList {
    #[serde(default)]
    items: Vec<ObjectItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectItem {
    name: String,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// `ObjectStore` for one bucket, authenticated as a service account.
pub struct GcsObjectStore {
    client: reqwest::Client,
    bucket: String,
    key: ServiceAccountKey,
    token: Mutex<Option<CachedToken>>,
}

impl GcsObjectStore {
    /// Create a store for the bucket and service account of `access`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service account key is not valid JSON or the
    /// HTTP client cannot be built.
    pub fn new(access: &CloudStorageAccess) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_slice(&access.service_account_key)
            .context("failed to parse service account key")?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("beach/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            bucket: access.bucket.clone(),
            key,
            token: Mutex::new(None),
        })
    }

    fn cached_token(&self) -> Option<String> {
        let guard = self.token.lock().ok()?;
        guard
            .as_ref()
            .filter(|token| token.expires_at > Utc::now())
            .map(|token| token.value.clone())
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let now = Utc::now();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .context("invalid service account private key")?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .context("failed to sign token request")?;

        let response: TokenResponse = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("failed to request access token")?
            .error_for_status()
            .context("access token request was rejected")?
            .json()
            .await
            .context("failed to parse access token response")?;

        tracing::debug!(account = %self.key.client_email, "obtained storage access token");
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(CachedToken {
                value: response.access_token.clone(),
                expires_at: now + Duration::seconds(TOKEN_LIFETIME_SECS - TOKEN_REFRESH_MARGIN_SECS),
            });
        }
        Ok(response.access_token)
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{API_BASE}/b/{}/o/{}",
            encode(&self.bucket),
            encode(name)
        )
    }
}

fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, NON_ALPHANUMERIC).to_string()
}

/// Sibling of `target` that a download is written to until it completes.
fn part_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".part");
    target.with_file_name(name)
}

async fn write_body(response: &mut reqwest::Response, part: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(part)
        .await
        .with_context(|| format!("failed to create {}", part.display()))?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk)
            .await
            .with_context(|| format!("failed to write {}", part.display()))?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Move a completed download into place, or drop the partial file.
async fn finish_part_file(part: &Path, target: &Path, written: Result<u64>) -> Result<u64> {
    match written {
        Ok(bytes) => {
            tokio::fs::rename(part, target)
                .await
                .with_context(|| format!("failed to move download to {}", target.display()))?;
            Ok(bytes)
        }
        Err(e) => {
            if let Err(remove) = tokio::fs::remove_file(part).await {
                tracing::debug!(part = %part.display(), error = %remove, "failed to remove partial download");
            }
            Err(e)
        }
    }
}

impl ObjectStore for GcsObjectStore {
    async fn list_objects(&self) -> Result<Vec<String>> {
        let url = format!("{API_BASE}/b/{}/o", encode(&self.bucket));
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(self.access_token().await?)
                .query(&[("fields", "items(name),nextPageToken")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let page: ObjectList = request
                .send()
                .await
                .with_context(|| format!("failed to list bucket {}", self.bucket))?
                .error_for_status()?
                .json()
                .await
                .context("failed to parse object list")?;

            names.extend(page.items.into_iter().map(|item| item.name));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(names)
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.object_url(name))
            .bearer_auth(self.access_token().await?)
            .send()
            .await
            .with_context(|| format!("failed to look up {name}"))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response.error_for_status()?;
        Ok(true)
    }

    async fn download(&self, name: &str, target: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(self.object_url(name))
            .query(&[("alt", "media")])
            .bearer_auth(self.access_token().await?)
            .send()
            .await
            .with_context(|| format!("failed to download {name}"))?
            .error_for_status()?;

        let part = part_path(target);
        let written = write_body(&mut response, &part).await;
        finish_part_file(&part, target, written).await
    }

    async fn upload(&self, name: &str, source: &Path) -> Result<u64> {
        let file = tokio::fs::File::open(source)
            .await
            .with_context(|| format!("failed to open {}", source.display()))?;
        let size = file
            .metadata()
            .await
            .with_context(|| format!("failed to stat {}", source.display()))?
            .len();
        let url = format!("{UPLOAD_BASE}/b/{}/o", encode(&self.bucket));

        self.client
            .post(url)
            .query(&[("uploadType", "media"), ("name", name)])
            .bearer_auth(self.access_token().await?)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .header(reqwest::header::CONTENT_LENGTH, size)
            .body(reqwest::Body::from(file))
            .send()
            .await
            .with_context(|| format!("failed to upload {name}"))?
            .error_for_status()
            .map_err(|e| anyhow!("upload of {name} was rejected: {e}"))?;
        Ok(size)
    }
}
