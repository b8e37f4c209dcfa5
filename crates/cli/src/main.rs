//! User directory CLI - Database migrations and offline import.
//!
//! # Usage
//!
//! ```bash
//! # Create or update the users table
//! udir-cli migrate
//!
//! # Load the upstream feed without starting the HTTP server
//! udir-cli import
//!
//! # Load from a different feed
//! udir-cli import --url https://example.com/users.json
//! ```
//!
//! Both commands read the same environment as the server
//! (`USER_DIRECTORY_DATABASE_URL`, `USER_DIRECTORY_IMPORT_URL`, ...).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "udir-cli")]
#[command(author, version, about = "User directory CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Import users from the upstream feed
    Import {
        /// Feed URL (overrides `USER_DIRECTORY_IMPORT_URL`)
        #[arg(short, long)]
        url: Option<Url>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Import { url } => commands::import::run(url).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_import_url_is_parsed() {
        let cli = Cli::try_parse_from(["udir-cli", "import", "--url", "http://localhost:9000/users"]);
        assert!(matches!(
            cli,
            Ok(Cli { command: Commands::Import { url: Some(ref u) } })
                if u.as_str() == "http://localhost:9000/users"
        ));
    }

    #[test]
    fn test_import_rejects_bad_url() {
        assert!(Cli::try_parse_from(["udir-cli", "import", "--url", "not a url"]).is_err());
    }
}
