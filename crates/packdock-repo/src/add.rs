//! Repository registration
//!
//! The add flow is deliberately two-phase. First a fast, advisory duplicate
//! check against an unlocked read of the registry, then the remote is
//! validated by fetching its index (slow, network-bound, no lock held), and
//! only then is the cross-process lock taken for the authoritative
//! reload-merge-write. The advisory check is racy: two concurrent adds with
//! `no_update` for the same new name can both pass it, and the later writer
//! wins silently. That fast-fail UX is intentional; the authoritative
//! semantics are last-writer-wins inside the critical section.

use std::path::PathBuf;
use std::time::Duration;

use crate::credentials::PasswordPrompt;
use crate::error::{RepoError, Result};
use crate::getter::Getters;
use crate::home::Home;
use crate::lock::{RegistryLock, LOCK_POLL, LOCK_TIMEOUT};
use crate::registry::{RegistryEntry, RegistryFile};
use crate::repository::ChartRepository;

/// Arguments for registering a repository
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub name: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub ca_file: Option<PathBuf>,
    /// Raise an error if the name is already registered
    pub no_update: bool,
}

/// Coordinates registry mutations against a home directory
pub struct Registrar<'a> {
    home: &'a Home,
    getters: &'a Getters,
    lock_timeout: Duration,
    lock_poll: Duration,
}

impl<'a> Registrar<'a> {
    pub fn new(home: &'a Home, getters: &'a Getters) -> Self {
        Self {
            home,
            getters,
            lock_timeout: LOCK_TIMEOUT,
            lock_poll: LOCK_POLL,
        }
    }

    /// Override the lock wait bound (tests shorten it)
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Override the lock poll interval
    pub fn lock_poll(mut self, poll: Duration) -> Self {
        self.lock_poll = poll;
        self
    }

    /// Register a repository: validate it by fetching its index, then
    /// insert-or-replace its entry in the registry under the lock.
    ///
    /// On any error the registry file is left exactly as it was.
    pub async fn add(
        &self,
        mut opts: AddOptions,
        prompt: &dyn PasswordPrompt,
    ) -> Result<RegistryEntry> {
        if opts.username.is_some() && opts.password.is_none() {
            opts.password = Some(prompt.read_password()?);
        }

        // Advisory duplicate check. No lock is held, so a concurrent add can
        // commit between this read and the locked write below; the check
        // exists only for a fast failure in the common non-concurrent case.
        let registry = RegistryFile::load(&self.home.registry_file())?;
        if opts.no_update && registry.has(&opts.name) {
            return Err(RepoError::RepositoryAlreadyExists { name: opts.name });
        }

        let entry = RegistryEntry {
            name: opts.name.clone(),
            url: opts.url.clone(),
            cache: self.home.cache_index(&opts.name),
            username: opts.username,
            password: opts.password,
            cert_file: opts.cert_file,
            key_file: opts.key_file,
            ca_file: opts.ca_file,
        };

        // Validate before locking: the fetch may be slow and must not block
        // other registrations. A remote that cannot produce a parseable
        // index aborts the whole operation with no registry mutation.
        let repository = ChartRepository::new(entry.clone(), self.getters)?;
        if let Err(e) = repository.download_index(&self.home.cache_dir()).await {
            return Err(RepoError::UnreachableRepository {
                url: opts.url,
                reason: e.to_string(),
            });
        }

        let _lock = RegistryLock::acquire_with(
            &self.home.registry_lock(),
            self.lock_timeout,
            self.lock_poll,
        )
        .await?;

        // Re-read under the lock: the unlocked read above may be stale if
        // another process committed in the meantime.
        let mut registry = RegistryFile::load(&self.home.registry_file())?;
        registry.update(entry.clone());
        registry.write(&self.home.registry_file())?;

        tracing::debug!(name = %entry.name, url = %entry.url, "registered repository");
        Ok(entry)
    }

    /// Unregister a repository and drop its cached index
    pub async fn remove(&self, name: &str) -> Result<RegistryEntry> {
        let _lock = RegistryLock::acquire_with(
            &self.home.registry_lock(),
            self.lock_timeout,
            self.lock_poll,
        )
        .await?;

        let mut registry = RegistryFile::load(&self.home.registry_file())?;
        let removed = registry.remove(name)?;
        registry.write(&self.home.registry_file())?;

        let _ = std::fs::remove_file(&removed.cache);

        tracing::debug!(name = %removed.name, "unregistered repository");
        Ok(removed)
    }
}
