//! Roles and their permission lists

use sqlx::{SqlitePool, sqlite::SqliteRow};

use keel::meta_adapter::{CreateRole, Role, UpdateRole};
use keel::prelude::*;

use crate::utils::*;

/// Role columns, aliased so they can share a row with user columns
pub(crate) const ROLE_COLS: &str = "r.role_id, r.uuid AS role_uuid, r.name AS role_name, \
	r.description AS role_description, r.enabled AS role_enabled, \
	r.permissions AS role_permissions, r.created_at AS role_created_at, \
	r.updated_at AS role_updated_at";

/// Reads the role columns of a row, `None` when the (left joined) role is missing
pub(crate) fn role_from_row(row: &SqliteRow) -> ClResult<Option<Role>> {
	let Some(role_id) = get::<Option<i64>>(row, "role_id")? else {
		return Ok(None);
	};
	let Some(uuid) = get::<Option<Box<str>>>(row, "role_uuid")? else {
		return Ok(None);
	};
	let permissions: Option<String> = get(row, "role_permissions")?;
	let permissions = match permissions {
		Some(json) => serde_json::from_str(&json).map_err(|_| Error::DbError)?,
		None => Vec::new(),
	};

	Ok(Some(Role {
		role_id,
		uuid,
		name: get(row, "role_name")?,
		description: get(row, "role_description")?,
		enabled: get(row, "role_enabled")?,
		permissions,
		created_at: Timestamp(get(row, "role_created_at")?),
		updated_at: Timestamp(get(row, "role_updated_at")?),
	}))
}

fn required(role: ClResult<Option<Role>>) -> ClResult<Role> {
	role?.ok_or(Error::NotFound)
}

pub(crate) async fn create(db: &SqlitePool, role: &CreateRole<'_>) -> ClResult<Role> {
	let uuid = keel::utils::new_uuid();
	let permissions = serde_json::to_string(role.permissions)?;

	sqlx::query(
		"INSERT INTO roles (uuid, name, description, enabled, permissions) VALUES (?, ?, ?, ?, ?)",
	)
	.bind(&uuid)
	.bind(role.name)
	.bind(role.description)
	.bind(role.enabled)
	.bind(permissions)
	.execute(db)
	.await
	.map_err(map_write_err)?;

	read(db, &uuid).await
}

pub(crate) async fn read(db: &SqlitePool, uuid: &str) -> ClResult<Role> {
	let res = sqlx::query(&format!("SELECT {} FROM roles r WHERE r.uuid = ?", ROLE_COLS))
		.bind(uuid)
		.fetch_one(db)
		.await;

	map_res(res, |row| required(role_from_row(&row)))
}

pub(crate) async fn read_by_name(db: &SqlitePool, name: &str) -> ClResult<Role> {
	// name is COLLATE NOCASE
	let res = sqlx::query(&format!("SELECT {} FROM roles r WHERE r.name = ?", ROLE_COLS))
		.bind(name)
		.fetch_one(db)
		.await;

	map_res(res, |row| required(role_from_row(&row)))
}

pub(crate) async fn list(db: &SqlitePool) -> ClResult<Vec<Role>> {
	let rows = sqlx::query(&format!("SELECT {} FROM roles r ORDER BY r.name", ROLE_COLS))
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	rows.iter().map(|row| required(role_from_row(row))).collect()
}

pub(crate) async fn update(db: &SqlitePool, uuid: &str, role: &UpdateRole) -> ClResult<Role> {
	let permissions = role.permissions.as_ref().map(serde_json::to_string).transpose()?;

	let mut query = sqlx::QueryBuilder::new("UPDATE roles SET updated_at=unixepoch()");
	let has_updates = true;
	let has_updates = push_opt!(query, has_updates, "name", &role.name);
	let has_updates = push_patch!(query, has_updates, "description", &role.description);
	let has_updates = push_opt!(query, has_updates, "enabled", role.enabled);
	let _ = push_opt!(query, has_updates, "permissions", permissions);
	query.push(" WHERE uuid=").push_bind(uuid);

	let res = query.build().execute(db).await.map_err(map_write_err)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	read(db, uuid).await
}

pub(crate) async fn delete(db: &SqlitePool, uuid: &str) -> ClResult<()> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	sqlx::query("UPDATE users SET role_id=NULL WHERE role_id=(SELECT role_id FROM roles WHERE uuid=?)")
		.bind(uuid)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	let res = sqlx::query("DELETE FROM roles WHERE uuid=?")
		.bind(uuid)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(())
}

// vim: ts=4
