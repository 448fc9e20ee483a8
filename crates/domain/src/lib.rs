//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod role;
mod security;

pub use role::RoleDocument;
pub use security::{ApplicationScope, Permission};
