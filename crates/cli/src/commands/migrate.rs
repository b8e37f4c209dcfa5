//! Database migration command.
//!
//! Applies `crates/server/migrations/` to the database named by
//! `USER_DIRECTORY_DATABASE_URL` (or `DATABASE_URL`).

use user_directory_server::config::ServerConfig;
use user_directory_server::db;

use super::CommandError;

/// Run the user directory migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is unreachable,
/// or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let config = ServerConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
