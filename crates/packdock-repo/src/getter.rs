//! Pluggable index transport
//!
//! A getter fetches bytes from a repository URL. Getters are keyed by URL
//! scheme in a [`Getters`] set; the coordinator depends only on the
//! [`IndexGetter`] trait, so tests swap in stubs without any network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::{RepoError, Result};
use crate::registry::RegistryEntry;

/// Per-request credentials and TLS material
#[derive(Debug, Clone, Default)]
pub struct GetterOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub ca_file: Option<PathBuf>,
}

impl GetterOptions {
    /// Options carried by a registry entry
    pub fn from_entry(entry: &RegistryEntry) -> Self {
        Self {
            username: entry.username.clone(),
            password: entry.password.clone(),
            cert_file: entry.cert_file.clone(),
            key_file: entry.key_file.clone(),
            ca_file: entry.ca_file.clone(),
        }
    }
}

/// Transport capability for fetching a repository index
#[async_trait]
pub trait IndexGetter: Send + Sync {
    /// Fetch the resource at `url`, returning its raw bytes
    async fn get(&self, url: &str, opts: &GetterOptions) -> Result<Vec<u8>>;
}

/// Getters registered by URL scheme
#[derive(Clone, Default)]
pub struct Getters {
    by_scheme: HashMap<String, Arc<dyn IndexGetter>>,
}

impl Getters {
    /// Empty set, for callers that register their own getters
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard set: HTTP and HTTPS
    pub fn all() -> Self {
        let mut getters = Self::empty();
        let http: Arc<dyn IndexGetter> = Arc::new(HttpGetter::default());
        getters.insert("http", http.clone());
        getters.insert("https", http);
        getters
    }

    /// Register a getter for a scheme
    pub fn insert(&mut self, scheme: &str, getter: Arc<dyn IndexGetter>) {
        self.by_scheme.insert(scheme.to_string(), getter);
    }

    /// Select the getter for a URL by its scheme
    pub fn for_url(&self, raw: &str) -> Result<Arc<dyn IndexGetter>> {
        let parsed = Url::parse(raw).map_err(|e| RepoError::InvalidRepositoryUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        self.by_scheme
            .get(parsed.scheme())
            .cloned()
            .ok_or_else(|| RepoError::InvalidRepositoryUrl {
                url: raw.to_string(),
                reason: format!("no getter registered for scheme \"{}\"", parsed.scheme()),
            })
    }
}

/// HTTP(S) getter backed by reqwest
pub struct HttpGetter {
    timeout: Duration,
}

impl Default for HttpGetter {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl HttpGetter {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a client carrying the request's TLS material.
    ///
    /// The client is per-request because CA bundles and client identities
    /// vary per repository entry.
    fn build_client(&self, opts: &GetterOptions) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);

        if let Some(ca_file) = &opts.ca_file {
            let pem = std::fs::read(ca_file)?;
            let cert =
                reqwest::Certificate::from_pem(&pem).map_err(|e| RepoError::NetworkError {
                    message: format!("Invalid CA bundle {}: {}", ca_file.display(), e),
                })?;
            builder = builder.add_root_certificate(cert);
        }

        if let (Some(cert_file), Some(key_file)) = (&opts.cert_file, &opts.key_file) {
            let mut pem = std::fs::read(cert_file)?;
            pem.extend(std::fs::read(key_file)?);
            let identity =
                reqwest::Identity::from_pem(&pem).map_err(|e| RepoError::NetworkError {
                    message: format!(
                        "Invalid client certificate {} / {}: {}",
                        cert_file.display(),
                        key_file.display(),
                        e
                    ),
                })?;
            builder = builder.identity(identity);
        }

        builder.build().map_err(|e| RepoError::NetworkError {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl IndexGetter for HttpGetter {
    async fn get(&self, url: &str, opts: &GetterOptions) -> Result<Vec<u8>> {
        let client = self.build_client(opts)?;

        let mut request = client.get(url);
        if let Some(username) = &opts.username {
            request = request.basic_auth(username, opts.password.as_deref());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RepoError::HttpError {
                status: status.as_u16(),
                message: format!("Request to {} failed", url),
            });
        }

        let bytes = response.bytes().await.map_err(|e| RepoError::NetworkError {
            message: e.to_string(),
        })?;
        tracing::debug!(url, bytes = bytes.len(), "fetched index payload");
        Ok(bytes.to_vec())
    }
}
