//! Keel is a small CRUD-oriented API backend.
//!
//! # Features
//!
//! - Accounts: registration, login (JWT in the body and an `HttpOnly` cookie), logout
//! - Role based access control with a startup permission registry
//! - Generic key-value store, optionally scoped to an owning user
//! - Paginated user listing with key-value fields merged in
//! - Contact message submission
//! - File upload into pluggable blob storage

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

// Re-export shared types and adapter traits from keel-types
pub use keel_types::acl;
pub use keel_types::blob_adapter;
pub use keel_types::error;
pub use keel_types::filter;
pub use keel_types::meta_adapter;
pub use keel_types::types;
pub use keel_types::utils;
pub use keel_types::worker;

pub use keel_core as core;

// Feature modules
pub mod account;
pub mod contact;
pub mod file;
pub mod key_value;
pub mod role;
pub mod user;

// Local modules
pub mod app;
pub mod prelude;
pub mod routes;

pub use app::AppBuilder;
pub use keel_core::app::{App, AppBuilderOpts, AppState, RunMode};

// vim: ts=4
