//! Common test utilities and helpers
//!
//! Shared infrastructure of the HTTP-level tests: an isolated app instance per
//! test, seed data and a request helper driving the router directly.

#![allow(dead_code)]

pub mod adapters;
pub mod fixtures;

pub use adapters::*;
pub use fixtures::*;

// vim: ts=4
