//! Database migration command.
//!
//! Migrations are embedded from `crates/server/migrations/` at compile
//! time, so the binary can be shipped and run without the source tree.

use tracing::info;

use kasilink_server::db;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns an error if `KASILINK_DATABASE_URL` is not set, the database
/// is unreachable, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
