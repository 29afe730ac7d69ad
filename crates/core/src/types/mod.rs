//! Core types for KasiLink.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod status;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Price, PriceError};
pub use status::*;
pub use user::{Role, UserId};
