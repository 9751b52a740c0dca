//! CLI error types with exit code handling

use miette::Diagnostic;
use packdock_repo::RepoError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// User provided invalid input (bad name, bad URL, duplicate repository)
    #[error("{message}")]
    #[diagnostic(code(packdock::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Repository operation failed (unreachable remote, busy registry)
    #[error("{message}")]
    #[diagnostic(code(packdock::cli::repo))]
    Repo { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(packdock::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(packdock::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::Repo { .. } => exit_codes::REPO_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an input error
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: None,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        match &err {
            RepoError::RepositoryAlreadyExists { .. }
            | RepoError::RepositoryNotFound { .. }
            | RepoError::InvalidRepositoryUrl { .. } => CliError::Input {
                message: err.to_string(),
                help: None,
            },
            RepoError::Io(_) => CliError::Io {
                message: err.to_string(),
            },
            _ => CliError::Repo {
                message: err.to_string(),
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let dup = CliError::from(RepoError::RepositoryAlreadyExists {
            name: "stable".to_string(),
        });
        assert_eq!(dup.exit_code(), exit_codes::INPUT_ERROR);

        let busy = CliError::from(RepoError::LockTimeout {
            path: "/tmp/repositories.lock".into(),
            seconds: 30,
        });
        assert_eq!(busy.exit_code(), exit_codes::REPO_ERROR);

        let unreachable = CliError::from(RepoError::UnreachableRepository {
            url: "https://charts.example.com".to_string(),
            reason: "connection refused".to_string(),
        });
        assert_eq!(unreachable.exit_code(), exit_codes::REPO_ERROR);
    }
}
