//! Core infrastructure for the Keel API backend.
//!
//! Application state shared by every handler, request extractors, the
//! authentication middleware and the permission route guards.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod crypto;
pub mod extract;
pub mod middleware;
pub mod permission;
pub mod prelude;

pub use app::{App, AppBuilderOpts, AppState, RunMode};
pub use extract::{Auth, OptionalAuth, OptionalRequestId};
pub use middleware::PermissionCheckOutput;
pub use permission::PermissionRegistry;

// vim: ts=4
