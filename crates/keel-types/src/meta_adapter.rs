//! Adapter that manages roles, users, key-value records and contact messages
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::filter::KeySelector;
use crate::prelude::*;
use crate::types::{PageRequest, serialize_timestamp_iso};

// Role //
//******//
#[derive(Clone, Debug, Serialize)]
pub struct Role {
	#[serde(skip)]
	pub role_id: i64,
	pub uuid: Box<str>,
	pub name: Box<str>,
	pub description: Option<Box<str>>,
	pub enabled: bool,
	pub permissions: Vec<Box<str>>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateRole<'a> {
	pub name: &'a str,
	pub description: Option<&'a str>,
	pub enabled: bool,
	pub permissions: &'a [Box<str>],
}

#[derive(Debug, Default)]
pub struct UpdateRole {
	pub name: Option<Box<str>>,
	pub description: Patch<Box<str>>,
	pub enabled: Option<bool>,
	pub permissions: Option<Vec<Box<str>>>,
}

// Actor //
//*******//
/// Actor subtype, stored as a single character
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
	Admin,
	Customer,
	Technician,
	#[default]
	User,
}

impl ActorKind {
	pub fn as_code(self) -> &'static str {
		match self {
			ActorKind::Admin => "A",
			ActorKind::Customer => "C",
			ActorKind::Technician => "T",
			ActorKind::User => "U",
		}
	}

	pub fn from_code(code: &str) -> ClResult<Self> {
		match code {
			"A" => Ok(ActorKind::Admin),
			"C" => Ok(ActorKind::Customer),
			"T" => Ok(ActorKind::Technician),
			"U" => Ok(ActorKind::User),
			_ => Err(Error::Parse),
		}
	}
}

/// A user account together with its assigned role
#[derive(Clone, Debug)]
pub struct Actor {
	pub user_id: i64,
	pub uuid: Box<str>,
	pub username: Box<str>,
	pub name: Box<str>,
	pub email: Box<str>,
	pub contact_number: Option<Box<str>>,
	pub enabled: bool,
	pub kind: ActorKind,
	pub role: Option<Role>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateUser<'a> {
	pub username: &'a str,
	pub password_hash: &'a str,
	pub name: &'a str,
	pub email: &'a str,
	pub contact_number: Option<&'a str>,
	pub enabled: bool,
	pub kind: ActorKind,
	pub role_id: Option<i64>,
}

#[derive(Debug, Default)]
pub struct UpdateUser {
	pub name: Option<Box<str>>,
	pub email: Option<Box<str>>,
	pub contact_number: Patch<Box<str>>,
	pub enabled: Option<bool>,
	pub kind: Option<ActorKind>,
	pub role_id: Patch<i64>,
	pub password_hash: Option<Box<str>>,
}

/// How the free text `q` user filter is applied
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserSearch {
	/// `#42`: exact id match
	Id(i64),
	/// `#` followed by no digits
	NoMatch,
	/// case-sensitive substring of the display name
	Name(Box<str>),
}

#[derive(Debug, Default)]
pub struct ListUserOptions {
	pub search: Option<UserSearch>,
	pub roles: Vec<Box<str>>,
	pub enabled: Option<bool>,
	pub page: PageRequest,
}

// KeyValue //
//**********//
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OwnerRef {
	pub uuid: Box<str>,
	pub name: Box<str>,
}

#[derive(Clone, Debug, Serialize)]
pub struct KeyValueView {
	pub uuid: Box<str>,
	pub key: Box<str>,
	pub value: Box<str>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub updated_at: Timestamp,
	pub owner: Option<OwnerRef>,
}

#[derive(Clone, Debug)]
pub struct KeyValueFilter {
	pub keys: KeySelector,
	pub owner_uuids: Vec<Box<str>>,
	/// Disables the owner join and filter, never taken from a query parameter as is
	pub skip_owner_scoping: bool,
}

#[derive(Debug)]
pub struct SaveKeyValue<'a> {
	pub key: &'a str,
	pub value: &'a str,
	pub owner_id: Option<i64>,
	pub is_update: bool,
	pub uuid: Option<&'a str>,
}

// ContactMessage //
//****************//
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
pub struct ContactMessage {
	pub uuid: Box<str>,
	pub name: Box<str>,
	pub email_address: Box<str>,
	pub contact_number: Option<Box<str>>,
	pub message: Box<str>,
	pub submitted_by: Option<OwnerRef>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateContactMessage<'a> {
	pub name: &'a str,
	pub email: &'a str,
	pub contact_number: Option<&'a str>,
	pub message: &'a str,
	pub user_id: Option<i64>,
}

#[async_trait]
pub trait MetaAdapter: Debug + Send + Sync {
	// Roles
	//*******
	async fn create_role(&self, role: &CreateRole<'_>) -> ClResult<Role>;
	async fn read_role(&self, uuid: &str) -> ClResult<Role>;
	/// Case-insensitive lookup by name
	async fn read_role_by_name(&self, name: &str) -> ClResult<Role>;
	async fn list_roles(&self) -> ClResult<Vec<Role>>;
	async fn update_role(&self, uuid: &str, role: &UpdateRole) -> ClResult<Role>;
	/// Deletes a role, users holding it are left without a role
	async fn delete_role(&self, uuid: &str) -> ClResult<()>;

	// Users
	//*******
	async fn create_user(&self, user: &CreateUser<'_>) -> ClResult<Actor>;
	async fn read_user(&self, uuid: &str) -> ClResult<Actor>;
	async fn read_user_by_id(&self, user_id: i64) -> ClResult<Actor>;
	/// Returns the actor and its password hash
	async fn read_user_auth(&self, username: &str) -> ClResult<(Actor, Box<str>)>;
	/// Returns one page of users (ordered by id descending) and the total match count
	async fn list_users(&self, opts: &ListUserOptions) -> ClResult<(Vec<Actor>, u64)>;
	async fn update_user(&self, uuid: &str, user: &UpdateUser) -> ClResult<Actor>;
	/// Deletes a user and all of its key-value records in one transaction
	async fn delete_user(&self, uuid: &str) -> ClResult<()>;

	// Key-values
	//************
	async fn save_key_value(&self, kv: &SaveKeyValue<'_>) -> ClResult<KeyValueView>;
	async fn list_key_values(&self, filter: &KeyValueFilter) -> ClResult<Vec<KeyValueView>>;
	async fn delete_key_value(&self, uuid: &str) -> ClResult<()>;
	/// Returns the number of deleted records
	async fn delete_key_values_for_owner(&self, user_id: i64) -> ClResult<u64>;

	// Contact messages
	//******************
	async fn create_contact_message(
		&self,
		msg: &CreateContactMessage<'_>,
	) -> ClResult<ContactMessage>;
	async fn list_contact_messages(&self, page: PageRequest)
	-> ClResult<(Vec<ContactMessage>, u64)>;

	// Vars
	//******
	async fn read_var(&self, key: &str) -> ClResult<Option<Box<str>>>;
	async fn update_var(&self, key: &str, value: &str) -> ClResult<()>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_actor_kind_codes() {
		for kind in [ActorKind::Admin, ActorKind::Customer, ActorKind::Technician, ActorKind::User] {
			assert_eq!(ActorKind::from_code(kind.as_code()).unwrap(), kind);
		}
		assert!(ActorKind::from_code("X").is_err());
		assert_eq!(serde_json::to_value(ActorKind::Technician).unwrap(), "technician");
	}
}

// vim: ts=4
