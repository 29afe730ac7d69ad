//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Read the database URL the commands operate on.
pub fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    std::env::var("KASILINK_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "KASILINK_DATABASE_URL not set".into())
}
