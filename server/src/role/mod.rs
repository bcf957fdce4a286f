//! Role management

pub mod handler;

use crate::prelude::*;
use crate::utils::validate_length;

pub const ROLE_NAME_LEN: (usize, usize) = (2, 50);

pub fn validate_role_name(name: &str) -> ClResult<()> {
	let (min, max) = ROLE_NAME_LEN;
	validate_length("name", name, min, max)?;
	if name.chars().any(char::is_whitespace) {
		return Err(Error::ValidationError("role name must not contain whitespace".into()));
	}
	Ok(())
}

// vim: ts=4
