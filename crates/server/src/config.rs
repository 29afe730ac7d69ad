//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - none; every variable has a development default
//!
//! ## Optional
//! - `KASILINK_DATABASE_URL` - `PostgreSQL` connection string. When unset the
//!   server runs on the in-memory store (development only).
//! - `KASILINK_HOST` - Bind address (default: 127.0.0.1)
//! - `KASILINK_PORT` - Listen port (default: 3000)
//! - `KASILINK_ENV` - `development` or `production` (default: development)
//! - `IDENTITY_USERINFO_URL` - Identity provider userinfo endpoint used to
//!   verify bearer tokens. Required in production; when unset in development
//!   the server falls back to the static dev-token verifier.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Whether this is a production deployment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` connection URL (contains password). `None` selects the
    /// in-memory store.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Identity provider userinfo endpoint for bearer-token verification
    pub identity_userinfo_url: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed, or if
    /// production is selected without an identity provider endpoint.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("KASILINK_DATABASE_URL")
            .ok()
            .map(SecretString::from);

        let host = match std::env::var("KASILINK_HOST") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("KASILINK_HOST", value))?,
            Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match std::env::var("KASILINK_PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("KASILINK_PORT", value))?,
            Err(_) => 3000,
        };

        let environment = match std::env::var("KASILINK_ENV").as_deref() {
            Ok("production") => Environment::Production,
            Ok("development") | Err(_) => Environment::Development,
            Ok(other) => {
                return Err(ConfigError::InvalidEnvVar("KASILINK_ENV", other.to_owned()));
            }
        };

        let identity_userinfo_url = std::env::var("IDENTITY_USERINFO_URL").ok();
        if environment.is_production() && identity_userinfo_url.is_none() {
            return Err(ConfigError::MissingEnvVar("IDENTITY_USERINFO_URL"));
        }
        if let Some(endpoint) = &identity_userinfo_url {
            url::Url::parse(endpoint).map_err(|e| {
                ConfigError::InvalidEnvVar("IDENTITY_USERINFO_URL", e.to_string())
            })?;
        }

        Ok(Self {
            database_url,
            host,
            port,
            environment,
            identity_userinfo_url,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
