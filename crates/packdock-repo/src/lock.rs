//! Cross-process registry locking
//!
//! An advisory `fs2` lock on a sidecar file serializes the
//! reload-merge-write sequence across processes. Acquisition polls with a
//! bounded total wait rather than blocking indefinitely; a registry that
//! stays locked past the deadline is reported as busy, never mutated
//! unlocked.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{RepoError, Result};

/// Total time to wait for the lock before giving up
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between acquisition attempts while waiting
pub const LOCK_POLL: Duration = Duration::from_secs(1);

/// Held exclusive lock on the registry. Released on drop.
#[derive(Debug)]
pub struct RegistryLock {
    file: File,
    path: PathBuf,
}

impl RegistryLock {
    /// Acquire the lock at `path` with the default 30s/1s bounds
    pub async fn acquire(path: &Path) -> Result<Self> {
        Self::acquire_with(path, LOCK_TIMEOUT, LOCK_POLL).await
    }

    /// Acquire with explicit timeout and poll interval
    pub async fn acquire_with(path: &Path, timeout: Duration, poll: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| RepoError::LockFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let deadline = Instant::now() + timeout;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "acquired registry lock");
                    return Ok(Self {
                        file,
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if is_contended(&e) => {
                    let now = Instant::now();
                    if now >= deadline {
                        tracing::debug!(path = %path.display(), "registry lock wait timed out");
                        return Err(RepoError::LockTimeout {
                            path: path.to_path_buf(),
                            seconds: timeout.as_secs(),
                        });
                    }
                    tokio::time::sleep(poll.min(deadline - now)).await;
                }
                Err(e) => {
                    return Err(RepoError::LockFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        if let Err(e) = fs2::FileExt::unlock(&self.file) {
            tracing::warn!(
                path = %self.path.display(),
                "failed to release registry lock: {}",
                e
            );
        }
    }
}

fn is_contended(err: &std::io::Error) -> bool {
    let contended = fs2::lock_contended_error();
    err.kind() == contended.kind() || err.raw_os_error() == contended.raw_os_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_millis(40);

    #[tokio::test]
    async fn test_acquire_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.lock");

        let lock = RegistryLock::acquire_with(&path, SHORT, SHORT).await.unwrap();
        assert_eq!(lock.path(), path);
        drop(lock);

        // Reacquirable after release
        RegistryLock::acquire_with(&path, SHORT, SHORT).await.unwrap();
    }

    #[tokio::test]
    async fn test_times_out_while_held() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.lock");

        let held = RegistryLock::acquire_with(&path, SHORT, SHORT).await.unwrap();

        let err = RegistryLock::acquire_with(&path, Duration::from_millis(150), SHORT)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::LockTimeout { .. }));

        drop(held);
        RegistryLock::acquire_with(&path, SHORT, SHORT).await.unwrap();
    }

    #[tokio::test]
    async fn test_waits_until_holder_releases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.lock");

        let held = RegistryLock::acquire_with(&path, SHORT, SHORT).await.unwrap();

        let path2 = path.clone();
        let waiter = tokio::spawn(async move {
            RegistryLock::acquire_with(&path2, Duration::from_secs(5), Duration::from_millis(10))
                .await
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(held);

        waiter.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("repositories.lock");
        RegistryLock::acquire_with(&path, SHORT, SHORT).await.unwrap();
        assert!(path.exists());
    }
}
