//! Pocketbook Core - Shared types library.
//!
//! This crate provides the domain types used across all Pocketbook components:
//! - `web` - The contact-book web application
//! - `cli` - Command-line tools for managing the contact store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Contacts, storage keys, session users and form validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
