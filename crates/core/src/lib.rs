//! KasiLink Core - Shared domain library.
//!
//! This crate provides the types and pure logic used across all KasiLink
//! components:
//!
//! - `server` - REST API binary
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, email, and status enums
//! - [`policy`] - Authorization policy: pure allow/deny decisions
//! - [`lifecycle`] - Task and Order status state machines

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod lifecycle;
pub mod policy;
pub mod types;

pub use lifecycle::{
    OrderTransition, TaskTransition, TransitionError, order_transition, task_transition,
};
pub use policy::{Action, Actor, Deny, DenyReason, authorize};
pub use types::*;
