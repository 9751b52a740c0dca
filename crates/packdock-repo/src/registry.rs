//! Registry file persistence
//!
//! The registry is a single YAML file listing every configured repository.
//! It is the one shared mutable resource in the system: every operation
//! reloads it from disk, mutates the in-memory copy, and writes it back
//! whole. The in-memory value is a short-lived projection, never a cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{RepoError, Result};

/// One registered repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    /// Unique name for this repository
    pub name: String,

    /// Remote index location
    pub url: String,

    /// Local path where the fetched index is cached
    pub cache: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// TLS client certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,

    /// TLS client key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,

    /// CA bundle for server verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<PathBuf>,
}

/// The registry file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryFile {
    /// API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// When this file was last written
    #[serde(default = "Utc::now")]
    pub generated: DateTime<Utc>,

    /// Registered repositories, ordered by registration
    #[serde(default)]
    pub repositories: Vec<RegistryEntry>,
}

fn default_api_version() -> String {
    "packdock.io/v1".to_string()
}

impl Default for RegistryFile {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            generated: Utc::now(),
            repositories: Vec::new(),
        }
    }
}

impl RegistryFile {
    /// Load the registry from a file.
    ///
    /// A missing file is the first-run case and yields an empty registry,
    /// not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let registry: Self = serde_yaml::from_str(&content)?;
        Ok(registry)
    }

    /// Check whether a repository with this name is registered
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get a repository by name
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Insert or replace an entry by name.
    ///
    /// A replaced entry keeps its position; untouched entries keep their
    /// order, so rewrites stay diff-friendly.
    pub fn update(&mut self, entry: RegistryEntry) {
        match self.repositories.iter_mut().find(|r| r.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.repositories.push(entry),
        }
    }

    /// Remove an entry by name
    pub fn remove(&mut self, name: &str) -> Result<RegistryEntry> {
        let idx = self
            .repositories
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| RepoError::RepositoryNotFound {
                name: name.to_string(),
            })?;
        Ok(self.repositories.remove(idx))
    }

    /// List all repository names
    pub fn names(&self) -> Vec<&str> {
        self.repositories.iter().map(|r| r.name.as_str()).collect()
    }

    /// Persist the registry to `path`.
    ///
    /// Writes to a temp file in the same directory, fsyncs, then renames
    /// over the target. An interrupted write never leaves the registry
    /// truncated: the old file stays intact until the rename.
    pub fn write(&mut self, path: &Path) -> Result<()> {
        self.generated = Utc::now();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension(format!("yaml.{}.tmp", std::process::id()));

        {
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o644);
            }
            let mut file = options.open(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;
            file.sync_all()?;
        }

        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::debug!(
            path = %path.display(),
            repositories = self.repositories.len(),
            "wrote registry file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, url: &str) -> RegistryEntry {
        RegistryEntry {
            name: name.to_string(),
            url: url.to_string(),
            cache: PathBuf::from(format!("/cache/{}-index.yaml", name)),
            username: None,
            password: None,
            cert_file: None,
            key_file: None,
            ca_file: None,
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = RegistryFile::load(&dir.path().join("repositories.yaml")).unwrap();
        assert!(registry.repositories.is_empty());
        assert_eq!(registry.api_version, "packdock.io/v1");
    }

    #[test]
    fn test_update_insert_and_replace() {
        let mut registry = RegistryFile::default();
        registry.update(entry("stable", "https://charts.example.com/stable"));
        registry.update(entry("incubator", "https://charts.example.com/incubator"));
        registry.update(entry("stable", "https://mirror.example.com/stable"));

        assert_eq!(registry.repositories.len(), 2);
        // Replacement keeps position, untouched entries keep order
        assert_eq!(registry.repositories[0].name, "stable");
        assert_eq!(registry.repositories[0].url, "https://mirror.example.com/stable");
        assert_eq!(registry.repositories[1].name, "incubator");
    }

    #[test]
    fn test_remove() {
        let mut registry = RegistryFile::default();
        registry.update(entry("stable", "https://charts.example.com/stable"));

        let removed = registry.remove("stable").unwrap();
        assert_eq!(removed.name, "stable");
        assert!(registry.remove("stable").is_err());
    }

    #[test]
    fn test_write_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.yaml");

        let mut registry = RegistryFile::default();
        let mut e = entry("stable", "https://charts.example.com/stable");
        e.username = Some("deploy".to_string());
        registry.update(e);
        registry.write(&path).unwrap();

        let loaded = RegistryFile::load(&path).unwrap();
        assert_eq!(loaded.repositories.len(), 1);
        assert_eq!(loaded.repositories[0].username.as_deref(), Some("deploy"));
        // Unset credentials are omitted from the file entirely
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("password"));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.yaml");

        let mut registry = RegistryFile::default();
        registry.update(entry("stable", "https://charts.example.com/stable"));
        registry.write(&path).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("repositories.yaml")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.yaml");
        RegistryFile::default().write(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
