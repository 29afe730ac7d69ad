//! Identity provider integration.
//!
//! Token issuance and credential storage belong to the provider; this module
//! only turns an inbound bearer token into a verified-identity assertion
//! (subject id plus profile claims). Verification is kept pure from the
//! caller's perspective: the profile upsert happens separately in the auth
//! extractor, so "verify" and "ensure profile row" stay two explicit steps.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use kasilink_core::{Email, UserId};

/// Errors from identity verification.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider rejected the token.
    #[error("invalid token")]
    InvalidToken,
    /// The provider could not be reached.
    #[error("identity provider error: {0}")]
    Provider(#[from] reqwest::Error),
    /// The provider's response was missing or malformed claims.
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
}

/// A verified-identity assertion from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Stable subject id, used as the primary user key.
    pub subject: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: Option<String>,
}

/// Verifies bearer tokens against the identity provider.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a token and return the identity it asserts.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the token is invalid or the provider cannot
    /// be reached.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Claims returned by the provider's userinfo endpoint.
#[derive(Debug, Deserialize)]
struct UserinfoClaims {
    sub: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl UserinfoClaims {
    fn into_identity(self) -> Result<VerifiedIdentity, AuthError> {
        let email = self
            .email
            .ok_or_else(|| AuthError::InvalidClaims("missing email".to_owned()))?;
        let email = Email::parse(&email)
            .map_err(|e| AuthError::InvalidClaims(format!("bad email: {e}")))?;

        // Fall back to splitting the display name when the provider does not
        // supply structured given/family names.
        let (first_name, last_name) = match (self.given_name, self.family_name) {
            (Some(first), Some(last)) => (first, last),
            (first, last) => {
                let display = self.name.unwrap_or_default();
                let mut parts = display.split_whitespace();
                let split_first = parts.next().unwrap_or_default().to_owned();
                let split_last = parts.collect::<Vec<_>>().join(" ");
                (first.unwrap_or(split_first), last.unwrap_or(split_last))
            }
        };

        Ok(VerifiedIdentity {
            subject: UserId::from(self.sub),
            email,
            first_name,
            last_name,
            profile_image_url: self.picture,
        })
    }
}

/// Verifier that calls the provider's userinfo endpoint with the bearer
/// token. A 2xx response yields the identity; any 4xx means the token was
/// rejected.
pub struct UserinfoVerifier {
    client: reqwest::Client,
    userinfo_url: String,
}

impl UserinfoVerifier {
    /// Create a verifier for the given userinfo endpoint.
    #[must_use]
    pub fn new(userinfo_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            userinfo_url,
        }
    }
}

#[async_trait]
impl IdentityVerifier for UserinfoVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await?;

        if response.status().is_client_error() {
            return Err(AuthError::InvalidToken);
        }
        let response = response.error_for_status()?;

        let claims: UserinfoClaims = response.json().await?;
        claims.into_identity()
    }
}

/// Verifier backed by a fixed token table.
///
/// Used in development when no provider is configured, and by the test
/// suite. Unknown tokens are rejected exactly like a provider would.
#[derive(Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
}

impl StaticVerifier {
    /// Create an empty verifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token that verifies to the given identity.
    #[must_use]
    pub fn with_token(mut self, token: &str, identity: VerifiedIdentity) -> Self {
        self.tokens.insert(token.to_owned(), identity);
        self
    }

    /// A verifier with a single `dev-token` identity, for running the
    /// server locally without an identity provider.
    #[must_use]
    pub fn dev_fixture() -> Self {
        let identity = VerifiedIdentity {
            subject: UserId::from("dev-user"),
            email: Email::parse("dev@example.com").expect("static email is valid"),
            first_name: "Dev".to_owned(),
            last_name: "User".to_owned(),
            profile_image_url: None,
        };
        Self::new().with_token("dev-token", identity)
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
