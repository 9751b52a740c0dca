//! Repository management commands

use std::path::{Path, PathBuf};

use packdock_repo::{AddOptions, Getters, Home, Registrar, RegistryFile};

use crate::error::{CliError, Result};
use crate::prompt::TerminalPrompt;

/// Add a repository: validate the remote, then register it
#[allow(clippy::too_many_arguments)]
pub async fn add(
    home: Option<PathBuf>,
    name: &str,
    url: &str,
    username: Option<&str>,
    password: Option<&str>,
    no_update: bool,
    cert_file: Option<&Path>,
    key_file: Option<&Path>,
    ca_file: Option<&Path>,
) -> Result<()> {
    let home = resolve_home(home)?;
    let getters = Getters::all();

    let options = AddOptions {
        name: name.to_string(),
        url: url.to_string(),
        username: username.map(String::from),
        password: password.map(String::from),
        cert_file: cert_file.map(Path::to_path_buf),
        key_file: key_file.map(Path::to_path_buf),
        ca_file: ca_file.map(Path::to_path_buf),
        no_update,
    };

    let entry = Registrar::new(&home, &getters)
        .add(options, &TerminalPrompt)
        .await?;

    println!("\"{}\" has been added to your repositories", entry.name);
    Ok(())
}

/// List configured repositories
pub async fn list(home: Option<PathBuf>) -> Result<()> {
    let home = resolve_home(home)?;
    let registry = RegistryFile::load(&home.registry_file())?;

    if registry.repositories.is_empty() {
        println!("No repositories configured.");
        println!();
        println!("Add one with: packdock repo add <name> <url>");
        return Ok(());
    }

    println!("{:<20} {:<50}", "NAME", "URL");
    println!("{}", "-".repeat(70));
    for entry in &registry.repositories {
        println!("{:<20} {}", entry.name, entry.url);
    }

    Ok(())
}

/// Remove a repository and its cached index
pub async fn remove(home: Option<PathBuf>, name: &str) -> Result<()> {
    let home = resolve_home(home)?;
    let getters = Getters::all();

    Registrar::new(&home, &getters).remove(name).await?;

    println!("\"{}\" has been removed from your repositories", name);
    Ok(())
}

fn resolve_home(home: Option<PathBuf>) -> Result<Home> {
    match home {
        Some(root) => Ok(Home::new(root)),
        None => Home::default_root().map_err(|e| CliError::internal(e.to_string())),
    }
}
