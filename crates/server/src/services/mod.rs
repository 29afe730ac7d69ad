//! External service integrations.

pub mod identity;
