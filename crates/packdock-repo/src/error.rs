//! Error types for registry operations

use std::path::PathBuf;
use thiserror::Error;

/// Registry operation errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Registry Errors ============
    #[error("Repository name ({name}) already exists, please specify a different name")]
    RepositoryAlreadyExists { name: String },

    #[error("Repository not found: {name}")]
    RepositoryNotFound { name: String },

    #[error("Invalid repository URL: {url} - {reason}")]
    InvalidRepositoryUrl { url: String, reason: String },

    #[error("Invalid registry configuration: {message}")]
    InvalidConfig { message: String },

    // ============ Validation Errors ============
    #[error("Looks like {url} is not a valid package repository or cannot be reached: {reason}")]
    UnreachableRepository { url: String, reason: String },

    #[error("Index parse error: {message}")]
    IndexParse { message: String },

    // ============ Locking Errors ============
    #[error("Registry at {path} is busy: lock not acquired within {seconds}s")]
    LockTimeout { path: PathBuf, seconds: u64 },

    #[error("Failed to lock registry at {path}: {message}")]
    LockFailed { path: PathBuf, message: String },

    // ============ Credential Errors ============
    #[error("Failed to read password: {message}")]
    PasswordPrompt { message: String },

    // ============ Network Errors ============
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RepoError::Timeout { seconds: 30 }
        } else if e.is_connect() {
            RepoError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            RepoError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            RepoError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_yaml::Error> for RepoError {
    fn from(e: serde_yaml::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

impl From<url::ParseError> for RepoError {
    fn from(e: url::ParseError) -> Self {
        RepoError::InvalidRepositoryUrl {
            url: String::new(),
            reason: e.to_string(),
        }
    }
}
