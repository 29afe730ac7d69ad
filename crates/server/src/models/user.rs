//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kasilink_core::{Email, Role, UserId};

/// A stored user profile.
///
/// The id is the identity provider's subject id and never changes. The
/// profile fields are refreshed from the provider's claims on every
/// successful verification; the role is only ever changed by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields for the idempotent ensure-profile-row upsert.
///
/// Role is deliberately absent: a new row defaults to `customer` and an
/// existing row's role is never touched by re-verification.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: Option<String>,
}
