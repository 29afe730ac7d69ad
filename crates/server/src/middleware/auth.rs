//! Authentication extractors.
//!
//! Protected handlers take [`RequireAuth`], which resolves the caller in
//! two explicit steps: verify the bearer token with the identity provider,
//! then run the idempotent ensure-profile-row upsert. The extractor yields
//! the stored user, so handlers see the platform role rather than the raw
//! provider claims. A rejected token fails with 401 before any handler
//! logic runs; a provider outage or malformed claims response is not the
//! caller's fault and surfaces as 500 instead.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use kasilink_core::{Actor, UserId};

use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::services::identity::{AuthError, VerifiedIdentity};
use crate::state::AppState;

/// Extractor that requires a verified identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.first_name)
/// }
/// ```
pub struct RequireAuth(pub User);

impl RequireAuth {
    /// The caller as a policy actor.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::new(self.0.id.clone(), self.0.role)
    }

    /// The caller's subject id.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.0.id
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn resolve_user(parts: &Parts, state: &AppState) -> Result<User, AppError> {
    let token = bearer_token(&parts.headers)
        .ok_or_else(|| AppError::Unauthorized("no token provided".to_owned()))?;

    // Step 1: pure verification against the provider. Only an actual token
    // rejection is the caller's fault; provider failures stay `Auth` errors
    // so they respond as 500 and reach Sentry.
    let identity = state.verifier().verify(token).await.map_err(|err| match err {
        AuthError::InvalidToken => AppError::Unauthorized("invalid token".to_owned()),
        err => AppError::Auth(err),
    })?;

    // Step 2: idempotent profile upsert keyed by the verified subject id.
    // Refreshes profile claims, never the id or role.
    let user = state.storage().upsert_user(new_user(identity)).await?;
    Ok(user)
}

fn new_user(identity: VerifiedIdentity) -> NewUser {
    NewUser {
        id: identity.subject,
        email: identity.email,
        first_name: identity.first_name,
        last_name: identity.last_name,
        profile_image_url: identity.profile_image_url,
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state).await.map(Self)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
