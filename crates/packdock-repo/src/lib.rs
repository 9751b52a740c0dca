//! Packdock repository registry management
//!
//! This crate registers remote package-chart repositories into a local,
//! file-backed registry and caches each repository's index for later lookup:
//!
//! - **Registry store**: loads, mutates, and atomically persists the
//!   registry file; every operation reloads it fresh from disk
//! - **Registration coordinator**: validates a remote by fetching its index,
//!   then merges the entry under a bounded-wait cross-process lock
//! - **Pluggable getters**: index transport selected by URL scheme
//!
//! ## Example
//!
//! ```rust,no_run
//! use packdock_repo::{AddOptions, Getters, Home, NoPrompt, Registrar};
//!
//! # async fn example() -> packdock_repo::Result<()> {
//! let home = Home::default_root()?;
//! let getters = Getters::all();
//!
//! let entry = Registrar::new(&home, &getters)
//!     .add(
//!         AddOptions {
//!             name: "stable".to_string(),
//!             url: "https://charts.example.com/stable".to_string(),
//!             ..Default::default()
//!         },
//!         &NoPrompt,
//!     )
//!     .await?;
//!
//! println!("cached index at {}", entry.cache.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency notes
//!
//! The registry file is the single source of truth. The reload-merge-write
//! sequence runs under an exclusive advisory lock (30s bounded wait, 1s
//! poll); the index fetch happens before the lock so slow networks never
//! block other registrations. Concurrent adds for the same name resolve to
//! last-writer-wins.

pub mod add;
pub mod credentials;
pub mod error;
pub mod getter;
pub mod home;
pub mod index;
pub mod lock;
pub mod registry;
pub mod repository;

// Re-exports for convenience
pub use add::{AddOptions, Registrar};
pub use credentials::{NoPrompt, PasswordPrompt};
pub use error::{RepoError, Result};
pub use getter::{GetterOptions, Getters, HttpGetter, IndexGetter};
pub use home::Home;
pub use index::{ChartVersion, RepositoryIndex};
pub use lock::{RegistryLock, LOCK_POLL, LOCK_TIMEOUT};
pub use registry::{RegistryEntry, RegistryFile};
pub use repository::ChartRepository;
