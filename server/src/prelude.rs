pub use keel_core::prelude::*;
pub use keel_core::extract::{Auth, OptionalAuth, OptionalRequestId};
pub use keel_types::types::{ApiResponse, ResponseCode};

// vim: ts=4
