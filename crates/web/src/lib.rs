//! Pocketbook web application library.
//!
//! A contact book served as server-rendered pages: a route table and router,
//! a page controller with an auth guard, a contact store over a key-value
//! store, and login against a static users resource.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod contacts;
pub mod controller;
pub mod error;
mod filters;
pub mod middleware;
pub mod render;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
