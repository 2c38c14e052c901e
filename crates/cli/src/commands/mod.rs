//! CLI command implementations.

pub mod contacts;
pub mod users;
