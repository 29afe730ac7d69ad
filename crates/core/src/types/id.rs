//! Newtype IDs for type-safe entity references.
//!
//! Store-assigned integer keys get their own wrapper type so a `ShopId`
//! can never be passed where an `OrderId` is expected. User IDs are opaque
//! strings issued by the identity provider and live in [`crate::types::user`].

/// Define a type-safe ID wrapper around `i32`.
///
/// Generates:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` in both directions
/// - A transparent `sqlx::Type` implementation (with the `postgres` feature)
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier for a [shop](crate::types::status::ShopCategory).
    ShopId
);
define_id!(
    /// Identifier for a product listed by a shop.
    ProductId
);
define_id!(
    /// Identifier for a community task.
    TaskId
);
define_id!(
    /// Identifier for a customer order.
    OrderId
);
