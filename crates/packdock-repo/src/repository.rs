//! Chart repository handle
//!
//! Wraps a registry entry with the getter selected for its URL scheme and
//! knows how to fetch, validate, and cache the remote index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::getter::{GetterOptions, Getters, IndexGetter};
use crate::index::RepositoryIndex;
use crate::registry::RegistryEntry;

pub struct ChartRepository {
    entry: RegistryEntry,
    getter: Arc<dyn IndexGetter>,
}

impl ChartRepository {
    /// Bind an entry to the getter for its URL scheme
    pub fn new(entry: RegistryEntry, getters: &Getters) -> Result<Self> {
        let getter = getters.for_url(&entry.url)?;
        Ok(Self { entry, getter })
    }

    pub fn entry(&self) -> &RegistryEntry {
        &self.entry
    }

    /// URL of the remote index document
    pub fn index_url(&self) -> String {
        format!("{}/index.yaml", self.entry.url.trim_end_matches('/'))
    }

    /// Fetch the remote index, validate that it parses, and cache the raw
    /// bytes at the entry's cache path.
    ///
    /// Any failure here means the remote is not a usable repository; nothing
    /// is written unless the payload validated.
    pub async fn download_index(&self, cache_dir: &Path) -> Result<PathBuf> {
        let url = self.index_url();
        let opts = GetterOptions::from_entry(&self.entry);
        let bytes = self.getter.get(&url, &opts).await?;

        RepositoryIndex::from_bytes(&bytes)?;

        std::fs::create_dir_all(cache_dir)?;
        let cache_path = if self.entry.cache.is_absolute() {
            self.entry.cache.clone()
        } else {
            cache_dir.join(&self.entry.cache)
        };
        write_atomic(&cache_path, &bytes)?;

        tracing::debug!(
            name = %self.entry.name,
            cache = %cache_path.display(),
            "cached repository index"
        );
        Ok(cache_path)
    }
}

// Cache writes are not serialized by the registry lock, so the temp name
// carries a per-process counter in addition to the pid.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let temp_path = path.with_extension(format!("yaml.{}.{}.tmp", std::process::id(), n));
    std::fs::write(&temp_path, bytes)?;
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> RegistryEntry {
        RegistryEntry {
            name: "stable".to_string(),
            url: url.to_string(),
            cache: PathBuf::from("stable-index.yaml"),
            username: None,
            password: None,
            cert_file: None,
            key_file: None,
            ca_file: None,
        }
    }

    #[test]
    fn test_index_url_normalizes_trailing_slash() {
        let getters = Getters::all();
        let with_slash =
            ChartRepository::new(entry("https://charts.example.com/stable/"), &getters).unwrap();
        let without =
            ChartRepository::new(entry("https://charts.example.com/stable"), &getters).unwrap();
        assert_eq!(with_slash.index_url(), without.index_url());
        assert_eq!(
            without.index_url(),
            "https://charts.example.com/stable/index.yaml"
        );
    }

    #[test]
    fn test_unsupported_scheme_fails_at_construction() {
        let getters = Getters::all();
        assert!(ChartRepository::new(entry("ftp://charts.example.com"), &getters).is_err());
    }
}
