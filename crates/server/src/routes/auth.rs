//! Identity endpoints.

use axum::{Json, Router, routing::get};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/auth/user", get(current_user))
}

/// Return the caller's stored profile.
///
/// The auth extractor has already verified the token and upserted the
/// profile row, so this is a pure echo of the stored state.
async fn current_user(auth: RequireAuth) -> Result<Json<User>> {
    Ok(Json(auth.0))
}
