//! Role based access control
//!
//! Answers permission and role questions for the actor of one request. An
//! actor grants no permission when it is absent or disabled, has no role, or
//! its role is disabled. Role membership only looks at the assigned role name,
//! compared case-sensitively.

use crate::meta_adapter::{Actor, Role};
use crate::prelude::*;

pub const ADMIN_ROLES: [&str; 3] = ["admin", "super_admin", "administrator"];

#[derive(Clone, Copy, Debug)]
pub struct AccessControl<'a> {
	actor: Option<&'a Actor>,
}

impl<'a> AccessControl<'a> {
	pub fn new(actor: Option<&'a Actor>) -> Self {
		Self { actor }
	}

	/// The role that grants permissions, if any
	fn active_role(&self) -> Option<&'a Role> {
		let actor = self.actor.filter(|a| a.enabled)?;
		actor.role.as_ref().filter(|r| r.enabled)
	}

	pub fn has_permission(&self, permission: &str) -> bool {
		self.active_role().is_some_and(|role| role.permissions.iter().any(|p| &**p == permission))
	}

	/// False for an empty list
	pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
		permissions.iter().any(|p| self.has_permission(p))
	}

	/// True for an empty list, as long as the actor holds an enabled role
	pub fn has_all_permissions(&self, permissions: &[&str]) -> bool {
		self.active_role().is_some() && permissions.iter().all(|p| self.has_permission(p))
	}

	pub fn permission_results(&self, permissions: &[&str]) -> Vec<(Box<str>, bool)> {
		permissions.iter().map(|p| ((*p).into(), self.has_permission(p))).collect()
	}

	/// Membership of the assigned role, regardless of the enabled flags
	pub fn has_role(&self, name: &str) -> bool {
		self.actor.and_then(|a| a.role.as_ref()).is_some_and(|role| &*role.name == name)
	}

	pub fn has_any_role(&self, names: &[&str]) -> bool {
		names.iter().any(|name| self.has_role(name))
	}

	pub fn is_admin(&self) -> bool {
		self.has_any_role(&ADMIN_ROLES)
	}

	/// Effective permissions, empty when the actor or its role is disabled
	pub fn actor_permissions(&self) -> Vec<Box<str>> {
		let mut perms = self.active_role().map(|role| role.permissions.clone()).unwrap_or_default();
		perms.sort();
		perms.dedup();
		perms
	}

	pub fn deny_unless_granted(&self, permission: &str) -> ClResult<()> {
		if self.has_permission(permission) {
			Ok(())
		} else {
			warn!(
				actor = self.actor.map(|a| &*a.username),
				permission = permission,
				"permission denied"
			);
			Err(Error::PermissionDenied)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::meta_adapter::ActorKind;

	fn role(name: &str, enabled: bool, perms: &[&str]) -> Role {
		Role {
			role_id: 1,
			uuid: "role-uuid".into(),
			name: name.into(),
			description: None,
			enabled,
			permissions: perms.iter().map(|p| (*p).into()).collect(),
			created_at: Timestamp(0),
			updated_at: Timestamp(0),
		}
	}

	fn actor(enabled: bool, role: Option<Role>) -> Actor {
		Actor {
			user_id: 42,
			uuid: "actor-uuid".into(),
			username: "jane".into(),
			name: "Jane".into(),
			email: "jane@example.com".into(),
			contact_number: None,
			enabled,
			kind: ActorKind::User,
			role,
			created_at: Timestamp(0),
			updated_at: Timestamp(0),
		}
	}

	#[test]
	fn test_absent_actor() {
		let acl = AccessControl::new(None);
		assert!(!acl.has_permission("user.read"));
		assert!(!acl.has_all_permissions(&[]));
		assert!(!acl.is_admin());
		assert!(acl.actor_permissions().is_empty());
		assert!(matches!(acl.deny_unless_granted("user.read"), Err(Error::PermissionDenied)));
	}

	#[test]
	fn test_exact_membership() {
		let a = actor(true, Some(role("editor", true, &["user.read", "user.write"])));
		let acl = AccessControl::new(Some(&a));
		assert!(acl.has_permission("user.read"));
		assert!(!acl.has_permission("user"));
		assert!(!acl.has_permission("role.read"));
		assert!(acl.deny_unless_granted("user.write").is_ok());
	}

	#[test]
	fn test_disabled_actor_grants_nothing() {
		let a = actor(false, Some(role("editor", true, &["user.read"])));
		let acl = AccessControl::new(Some(&a));
		assert!(!acl.has_permission("user.read"));
		assert!(acl.has_role("editor"));
		assert!(acl.actor_permissions().is_empty());
	}

	#[test]
	fn test_disabled_role_grants_nothing() {
		let a = actor(true, Some(role("admin", false, &["user.read"])));
		let acl = AccessControl::new(Some(&a));
		assert!(!acl.has_permission("user.read"));
		assert!(acl.has_role("admin"));
		assert!(acl.is_admin());
		assert!(acl.actor_permissions().is_empty());
	}

	#[test]
	fn test_no_role() {
		let a = actor(true, None);
		let acl = AccessControl::new(Some(&a));
		assert!(!acl.has_permission("user.read"));
		assert!(!acl.has_all_permissions(&[]));
		assert!(!acl.has_role("admin"));
		assert!(!acl.has_any_role(&["admin", "editor"]));
	}

	#[test]
	fn test_any_and_all() {
		let a = actor(true, Some(role("editor", true, &["a", "b"])));
		let acl = AccessControl::new(Some(&a));
		assert!(acl.has_any_permission(&["x", "b"]));
		assert!(!acl.has_any_permission(&["x", "y"]));
		assert!(!acl.has_any_permission(&[]));
		assert!(acl.has_all_permissions(&["a", "b"]));
		assert!(!acl.has_all_permissions(&["a", "x"]));
		assert!(acl.has_all_permissions(&[]));
		assert_eq!(
			acl.permission_results(&["a", "x"]),
			vec![("a".into(), true), ("x".into(), false)]
		);
	}

	#[test]
	fn test_roles_case_sensitive() {
		let a = actor(true, Some(role("Admin", true, &[])));
		let acl = AccessControl::new(Some(&a));
		assert!(acl.has_role("Admin"));
		assert!(!acl.has_role("admin"));
		assert!(!acl.is_admin());

		let a = actor(true, Some(role("administrator", true, &[])));
		assert!(AccessControl::new(Some(&a)).is_admin());
		assert!(AccessControl::new(Some(&a)).has_any_role(&["x", "administrator"]));
	}

	#[test]
	fn test_actor_permissions_dedup() {
		let a = actor(true, Some(role("editor", true, &["b", "a", "b"])));
		let perms = AccessControl::new(Some(&a)).actor_permissions();
		assert_eq!(perms, vec![Box::<str>::from("a"), "b".into()]);
	}
}

// vim: ts=4
