//! User identity and role types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A user's stable identifier.
///
/// This is the subject id issued by the identity provider, stored verbatim
/// as an opaque string. It is immutable once assigned and is the primary key
/// for the user row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID from a verified subject id.
    #[must_use]
    pub const fn new(subject: String) -> Self {
        Self(subject)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `UserId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(subject: String) -> Self {
        Self(subject)
    }
}

impl From<&str> for UserId {
    fn from(subject: &str) -> Self {
        Self(subject.to_owned())
    }
}

/// A user's role on the platform.
///
/// Every user starts as `Customer`; only an admin may change another user's
/// role. Role names are stored and serialized in `snake_case` to match the
/// wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Customer,
    ShopOwner,
    Admin,
}

impl Role {
    /// Whether this role grants platform moderation rights.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Customer => "customer",
            Self::ShopOwner => "shop_owner",
            Self::Admin => "admin",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_is_opaque() {
        let id = UserId::from("firebase-uid-123");
        assert_eq!(id.as_str(), "firebase-uid-123");
        assert_eq!(id.to_string(), "firebase-uid-123");
    }

    #[test]
    fn test_role_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::ShopOwner).expect("serialize"),
            "\"shop_owner\""
        );
        let role: Role = serde_json::from_str("\"admin\"").expect("deserialize");
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_role_defaults_to_customer() {
        assert_eq!(Role::default(), Role::Customer);
        assert!(!Role::Customer.is_admin());
        assert!(Role::Admin.is_admin());
    }
}
