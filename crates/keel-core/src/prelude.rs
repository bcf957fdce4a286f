pub use crate::app::App;
pub use keel_types::prelude::*;

// vim: ts=4
