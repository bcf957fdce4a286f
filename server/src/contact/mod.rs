//! Contact messages: public submission, paginated listing for staff.
//!
//! Messages are only stored, nothing is sent.

pub mod handler;

use crate::prelude::*;
use crate::utils::{sanitize_phone, validate_email, validate_length};

pub const NAME_LEN: (usize, usize) = (3, 100);
pub const MESSAGE_LEN: (usize, usize) = (10, 5000);
const CONTACT_NUMBER_DIGITS: usize = 10;

/// A validated contact message submission
#[derive(Debug, PartialEq, Eq)]
pub struct ContactForm {
	pub name: Box<str>,
	pub email: Box<str>,
	pub contact_number: Option<Box<str>>,
	pub message: Box<str>,
}

impl ContactForm {
	pub fn new(
		name: &str,
		email: &str,
		contact_number: Option<&str>,
		message: &str,
	) -> ClResult<Self> {
		let name = name.trim();
		validate_length("name", name, NAME_LEN.0, NAME_LEN.1)?;
		let email = email.trim();
		validate_email("email_address", email)?;
		let message = message.trim();
		validate_length("message", message, MESSAGE_LEN.0, MESSAGE_LEN.1)?;

		let contact_number = match contact_number.map(sanitize_phone).filter(|c| !c.is_empty()) {
			Some(number)
				if number.len() == CONTACT_NUMBER_DIGITS
					&& number.chars().all(|c| c.is_ascii_digit()) =>
			{
				Some(number.into())
			}
			Some(_) => {
				return Err(Error::ValidationError(format!(
					"contact_number must be {} digits",
					CONTACT_NUMBER_DIGITS
				)));
			}
			None => None,
		};

		Ok(Self { name: name.into(), email: email.into(), contact_number, message: message.into() })
	}
}


// vim: ts=4
