//! Registry of the permissions roles may grant.
//!
//! Built once at startup; role create/update validates its permission list
//! against it.

use std::collections::BTreeMap;

use crate::prelude::*;

pub const SUPER_ADMIN: &str = "super_admin";
pub const USER_READ: &str = "user.read";
pub const USER_WRITE: &str = "user.write";
pub const KEY_VALUE_WRITE: &str = "key_value.write";
pub const ROLE_READ: &str = "role.read";
pub const ROLE_WRITE: &str = "role.write";
pub const CONTACT_MESSAGE_READ: &str = "contact_message.read";

const BUILTIN: [(&str, &str); 7] = [
	(SUPER_ADMIN, "Satisfies every permission check"),
	(USER_READ, "List and read users"),
	(USER_WRITE, "Create, update and delete users"),
	(KEY_VALUE_WRITE, "Create, update and delete key-value records"),
	(ROLE_READ, "List roles"),
	(ROLE_WRITE, "Create, update and delete roles"),
	(CONTACT_MESSAGE_READ, "List contact messages"),
];

#[derive(Debug, Clone)]
pub struct PermissionRegistry {
	permissions: BTreeMap<Box<str>, Box<str>>,
}

impl PermissionRegistry {
	/// Registry holding the built-in permissions
	pub fn new() -> Self {
		let mut registry = Self { permissions: BTreeMap::new() };
		for (name, description) in BUILTIN {
			registry.permissions.insert(name.into(), description.into());
		}
		registry
	}

	/// Registers an application specific permission
	pub fn register(&mut self, name: &str, description: &str) -> ClResult<()> {
		if name.is_empty() || name.chars().any(char::is_whitespace) {
			return Err(Error::ValidationError(format!("invalid permission name: {:?}", name)));
		}
		if self.permissions.contains_key(name) {
			return Err(Error::DuplicateResource);
		}
		self.permissions.insert(name.into(), description.into());
		Ok(())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.permissions.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.permissions.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
	}

	/// Validates a role permission list, returning it sorted and deduplicated
	pub fn validate(&self, permissions: &[Box<str>]) -> ClResult<Vec<Box<str>>> {
		if let Some(unknown) = permissions.iter().find(|p| !self.contains(p)) {
			return Err(Error::ValidationError(format!("unknown permission: {}", unknown)));
		}
		let mut res = permissions.to_vec();
		res.sort();
		res.dedup();
		Ok(res)
	}
}

impl Default for PermissionRegistry {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4
