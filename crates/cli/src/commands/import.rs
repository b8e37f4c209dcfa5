//! Offline import command.
//!
//! Runs the same import as `POST /api/users/import`, against the same
//! database, without starting the server.

use std::sync::Arc;

use url::Url;

use user_directory_server::config::ServerConfig;
use user_directory_server::db::{self, PgUserStore, columns};
use user_directory_server::services::{ImportClient, UserService};

use super::CommandError;

/// Fetch the feed and write every user in it.
///
/// # Errors
///
/// Returns an error if configuration is missing, the schema does not match,
/// the feed cannot be fetched or parsed, or a write fails.
pub async fn run(url: Option<Url>) -> Result<(), CommandError> {
    let mut config = ServerConfig::from_env()?;
    if let Some(url) = url {
        config.import.url = url;
    }

    let pool = db::create_pool(&config.database_url).await?;
    columns::validate_schema(&pool).await?;

    let source = ImportClient::new(&config.import)?;
    tracing::info!(url = %source.url(), "Importing users");

    let service = UserService::new(Arc::new(PgUserStore::new(pool)), Arc::new(source));
    let summary = service.import_from_source().await?;

    tracing::info!(imported = summary.imported, "{}", summary.message);
    Ok(())
}
