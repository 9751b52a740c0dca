//! Home directory layout
//!
//! All registry state lives under a single home directory: the registry file
//! itself, its lock, and the cached indexes. Defaults to
//! `~/.config/packdock` but callers can point it anywhere, which is how the
//! tests isolate themselves.

use std::path::{Path, PathBuf};

use crate::error::{RepoError, Result};

/// Root of the packdock state directory
#[derive(Debug, Clone)]
pub struct Home {
    root: PathBuf,
}

impl Home {
    /// Create a home rooted at an explicit directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Home at the default location under the user's config directory
    pub fn default_root() -> Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(Self::new(config_dir.join("packdock")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the registry file
    pub fn registry_file(&self) -> PathBuf {
        self.root.join("repositories.yaml")
    }

    /// Path of the registry lock file.
    ///
    /// A sidecar rather than the registry file itself: writes replace the
    /// registry via rename, which would swap the inode out from under a lock
    /// held on it.
    pub fn registry_lock(&self) -> PathBuf {
        self.root.join("repositories.lock")
    }

    /// Directory holding cached repository indexes
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// Cache path for a named repository's index
    pub fn cache_index(&self, name: &str) -> PathBuf {
        self.cache_dir().join(format!("{}-index.yaml", name))
    }

    /// Create the home and cache directories if missing
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.cache_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let home = Home::new("/tmp/pd-test");
        assert_eq!(
            home.registry_file(),
            PathBuf::from("/tmp/pd-test/repositories.yaml")
        );
        assert_eq!(
            home.registry_lock(),
            PathBuf::from("/tmp/pd-test/repositories.lock")
        );
        assert_eq!(
            home.cache_index("stable"),
            PathBuf::from("/tmp/pd-test/cache/stable-index.yaml")
        );
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let home = Home::new(dir.path().join("home"));
        home.ensure_dirs().unwrap();
        assert!(home.cache_dir().is_dir());
    }
}
