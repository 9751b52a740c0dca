//! Packdock CLI - manage package-chart repositories

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod error;
mod exit_codes;
mod prompt;

#[derive(Parser)]
#[command(name = "packdock")]
#[command(version)]
#[command(about = "Manage package-chart repositories", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the packdock home directory
    #[arg(long, global = true, env = "PACKDOCK_HOME")]
    home: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage chart repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },
}

#[derive(Subcommand)]
enum RepoCommands {
    /// Add a chart repository
    Add {
        /// Repository name
        name: String,

        /// Repository URL
        url: String,

        /// Chart repository username
        #[arg(long)]
        username: Option<String>,

        /// Chart repository password (prompted if username given without it)
        #[arg(long)]
        password: Option<String>,

        /// Raise an error if the repository is already registered
        #[arg(long)]
        no_update: bool,

        /// Identify HTTPS client using this SSL certificate file
        #[arg(long)]
        cert_file: Option<PathBuf>,

        /// Identify HTTPS client using this SSL key file
        #[arg(long)]
        key_file: Option<PathBuf>,

        /// Verify certificates of HTTPS-enabled servers using this CA bundle
        #[arg(long)]
        ca_file: Option<PathBuf>,
    },

    /// List configured repositories
    List,

    /// Remove a chart repository
    Remove {
        /// Repository name
        name: String,
    },
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    let result = match cli.command {
        Commands::Repo { command } => match command {
            RepoCommands::Add {
                name,
                url,
                username,
                password,
                no_update,
                cert_file,
                key_file,
                ca_file,
            } => {
                commands::repo::add(
                    cli.home,
                    &name,
                    &url,
                    username.as_deref(),
                    password.as_deref(),
                    no_update,
                    cert_file.as_deref(),
                    key_file.as_deref(),
                    ca_file.as_deref(),
                )
                .await
            }

            RepoCommands::List => commands::repo::list(cli.home).await,

            RepoCommands::Remove { name } => commands::repo::remove(cli.home, &name).await,
        },
    };

    if let Err(e) = result {
        let code = e.exit_code();
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(code);
    }
}
