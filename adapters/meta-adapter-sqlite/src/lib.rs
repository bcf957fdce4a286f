//! SQLite implementation of the Keel `MetaAdapter`.
//!
//! Each domain lives in its own module; this file wires them to the trait.

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use keel::meta_adapter::{
	Actor, ContactMessage, CreateContactMessage, CreateRole, CreateUser, KeyValueFilter,
	KeyValueView, ListUserOptions, MetaAdapter, Role, SaveKeyValue, UpdateRole, UpdateUser,
};
use keel::prelude::*;
use keel::types::PageRequest;

mod contact;
mod key_value;
mod role;
mod schema;
mod user;
mod utils;
mod var;

#[derive(Debug)]
pub struct MetaAdapterSqlite {
	db: SqlitePool,
}

impl MetaAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl MetaAdapter for MetaAdapterSqlite {
	// Roles
	//*******
	async fn create_role(&self, role: &CreateRole<'_>) -> ClResult<Role> {
		role::create(&self.db, role).await
	}

	async fn read_role(&self, uuid: &str) -> ClResult<Role> {
		role::read(&self.db, uuid).await
	}

	async fn read_role_by_name(&self, name: &str) -> ClResult<Role> {
		role::read_by_name(&self.db, name).await
	}

	async fn list_roles(&self) -> ClResult<Vec<Role>> {
		role::list(&self.db).await
	}

	async fn update_role(&self, uuid: &str, data: &UpdateRole) -> ClResult<Role> {
		role::update(&self.db, uuid, data).await
	}

	async fn delete_role(&self, uuid: &str) -> ClResult<()> {
		role::delete(&self.db, uuid).await
	}

	// Users
	//*******
	async fn create_user(&self, data: &CreateUser<'_>) -> ClResult<Actor> {
		user::create(&self.db, data).await
	}

	async fn read_user(&self, uuid: &str) -> ClResult<Actor> {
		user::read(&self.db, uuid).await
	}

	async fn read_user_by_id(&self, user_id: i64) -> ClResult<Actor> {
		user::read_by_id(&self.db, user_id).await
	}

	async fn read_user_auth(&self, username: &str) -> ClResult<(Actor, Box<str>)> {
		user::read_auth(&self.db, username).await
	}

	async fn list_users(&self, opts: &ListUserOptions) -> ClResult<(Vec<Actor>, u64)> {
		user::list(&self.db, opts).await
	}

	async fn update_user(&self, uuid: &str, data: &UpdateUser) -> ClResult<Actor> {
		user::update(&self.db, uuid, data).await
	}

	async fn delete_user(&self, uuid: &str) -> ClResult<()> {
		user::delete(&self.db, uuid).await
	}

	// Key-values
	//************
	async fn save_key_value(&self, kv: &SaveKeyValue<'_>) -> ClResult<KeyValueView> {
		key_value::save(&self.db, kv).await
	}

	async fn list_key_values(&self, filter: &KeyValueFilter) -> ClResult<Vec<KeyValueView>> {
		key_value::list(&self.db, filter).await
	}

	async fn delete_key_value(&self, uuid: &str) -> ClResult<()> {
		key_value::delete(&self.db, uuid).await
	}

	async fn delete_key_values_for_owner(&self, user_id: i64) -> ClResult<u64> {
		key_value::delete_for_owner(&self.db, user_id).await
	}

	// Contact messages
	//******************
	async fn create_contact_message(
		&self,
		msg: &CreateContactMessage<'_>,
	) -> ClResult<ContactMessage> {
		contact::create(&self.db, msg).await
	}

	async fn list_contact_messages(
		&self,
		page: PageRequest,
	) -> ClResult<(Vec<ContactMessage>, u64)> {
		contact::list(&self.db, page).await
	}

	// Vars
	//******
	async fn read_var(&self, key: &str) -> ClResult<Option<Box<str>>> {
		var::read(&self.db, key).await
	}

	async fn update_var(&self, key: &str, value: &str) -> ClResult<()> {
		var::update(&self.db, key, value).await
	}
}

// vim: ts=4
