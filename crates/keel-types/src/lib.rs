//! Shared types, adapter traits, and access control for the Keel API backend.
//!
//! Everything the storage adapters and the HTTP server have in common lives
//! here, so adapter crates build without pulling in the server.

pub mod acl;
pub mod blob_adapter;
pub mod error;
pub mod filter;
pub mod meta_adapter;
pub mod prelude;
pub mod types;
pub mod utils;
pub mod worker;

// vim: ts=4
