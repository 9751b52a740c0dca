//! Terminal password prompt

use packdock_repo::{PasswordPrompt, RepoError};

/// Reads a password from the terminal without echoing it
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&self) -> packdock_repo::Result<String> {
        rpassword::prompt_password("Password: ").map_err(|e| RepoError::PasswordPrompt {
            message: e.to_string(),
        })
    }
}
