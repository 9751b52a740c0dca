//! Credential resolution
//!
//! The coordinator never talks to a terminal. When a username is supplied
//! without a password it asks a [`PasswordPrompt`], so interactive callers
//! can wire up a real prompt and tests can supply a fixed secret.

use crate::error::{RepoError, Result};

/// Capability for reading a secret without echoing it
pub trait PasswordPrompt: Send + Sync {
    fn read_password(&self) -> Result<String>;
}

/// Prompt for non-interactive contexts; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl PasswordPrompt for NoPrompt {
    fn read_password(&self) -> Result<String> {
        Err(RepoError::PasswordPrompt {
            message: "a username was given without a password and no interactive prompt is available"
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_prompt_fails() {
        let err = NoPrompt.read_password().unwrap_err();
        assert!(matches!(err, RepoError::PasswordPrompt { .. }));
    }
}
