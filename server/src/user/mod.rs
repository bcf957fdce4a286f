//! User management: admin CRUD and the paginated user listing.

pub mod handler;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::meta_adapter::{Actor, ActorKind};
use crate::prelude::*;
use crate::types::serialize_timestamp_iso;
use crate::utils::{sanitize_phone, validate_email, validate_length};

pub const PASSWORD_LEN: (usize, usize) = (6, 40);
pub const NAME_LEN: (usize, usize) = (2, 50);
pub const USERNAME_LEN: (usize, usize) = (3, 100);
pub const CONTACT_NUMBER_LEN: (usize, usize) = (5, 20);

/// Field names a merged key-value may not shadow
const RESERVED_FIELDS: [&str; 10] = [
	"id",
	"uuid",
	"name",
	"username",
	"email_address",
	"contact_number",
	"enabled",
	"kind",
	"role",
	"created_at",
];

/// Public representation of a user
#[derive(Debug, Serialize)]
pub struct UserView {
	pub id: i64,
	pub uuid: Box<str>,
	pub name: Box<str>,
	pub username: Box<str>,
	pub email_address: Box<str>,
	pub contact_number: Option<Box<str>>,
	pub enabled: bool,
	pub kind: ActorKind,
	/// Role name
	pub role: Option<Box<str>>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
	/// Key-value records merged in as extra fields
	#[serde(flatten)]
	pub key_values: BTreeMap<Box<str>, Box<str>>,
}

impl From<&Actor> for UserView {
	fn from(actor: &Actor) -> Self {
		Self {
			id: actor.user_id,
			uuid: actor.uuid.clone(),
			name: actor.name.clone(),
			username: actor.username.clone(),
			email_address: actor.email.clone(),
			contact_number: actor.contact_number.clone(),
			enabled: actor.enabled,
			kind: actor.kind,
			role: actor.role.as_ref().map(|role| role.name.clone()),
			created_at: actor.created_at,
			key_values: BTreeMap::new(),
		}
	}
}

impl UserView {
	/// Merges a key-value field, unless it would shadow a built-in one
	pub fn merge_key_value(&mut self, key: &str, value: &str) {
		if RESERVED_FIELDS.contains(&key) {
			debug!("not merging key-value {:?} into user {}", key, self.uuid);
			return;
		}
		self.key_values.insert(key.into(), value.into());
	}
}

// Validation //
//************//
pub fn validate_password(password: &str) -> ClResult<()> {
	validate_length("password", password, PASSWORD_LEN.0, PASSWORD_LEN.1)
}

pub fn validate_name(name: &str) -> ClResult<()> {
	validate_length("name", name.trim(), NAME_LEN.0, NAME_LEN.1)
}

pub fn validate_username(username: &str) -> ClResult<()> {
	validate_length("username", username, USERNAME_LEN.0, USERNAME_LEN.1)?;
	if username.chars().any(char::is_whitespace) {
		return Err(Error::ValidationError("username must not contain whitespace".into()));
	}
	Ok(())
}

/// Sanitizes and validates an optional contact number, empty input means none
pub fn normalize_contact_number(contact_number: Option<&str>) -> ClResult<Option<Box<str>>> {
	let Some(contact_number) = contact_number.map(sanitize_phone).filter(|c| !c.is_empty()) else {
		return Ok(None);
	};
	let (min, max) = CONTACT_NUMBER_LEN;
	validate_length("contact_number", &contact_number, min, max)?;
	Ok(Some(contact_number.into()))
}

pub fn validate_email_address(email: &str) -> ClResult<()> {
	validate_email("email_address", email)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_contact_number() {
		assert_eq!(normalize_contact_number(None).unwrap(), None);
		assert_eq!(normalize_contact_number(Some(" - ")).unwrap(), None);
		assert_eq!(normalize_contact_number(Some("(06) 1-234")).unwrap().as_deref(), Some("061234"));
		assert!(normalize_contact_number(Some("12 3")).is_err());
	}

	#[test]
	fn test_username() {
		assert!(validate_username("jane@example.com").is_ok());
		assert!(validate_username("ja").is_err());
		assert!(validate_username("jane doe").is_err());
	}

	#[test]
	fn test_reserved_fields_not_merged() {
		let mut view = UserView {
			id: 1,
			uuid: "u".into(),
			name: "Jane".into(),
			username: "jane".into(),
			email_address: "jane@example.com".into(),
			contact_number: None,
			enabled: true,
			kind: ActorKind::User,
			role: None,
			created_at: Timestamp(0),
			key_values: BTreeMap::new(),
		};
		view.merge_key_value("name", "Mallory");
		view.merge_key_value("city", "Budapest");

		let json = serde_json::to_value(&view).unwrap();
		assert_eq!(json["name"], "Jane");
		assert_eq!(json["city"], "Budapest");
		assert_eq!(json["created_at"], "1970-01-01T00:00:00+00:00");
	}
}

// vim: ts=4
