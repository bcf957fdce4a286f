//! Key-value records, optionally owned by a user
//!
//! Key names are unique per owner scope; ownerless records form one global
//! scope. The unique index on `(coalesce(user_id, 0), key_name)` backs the
//! lookup done before an insert.

use sqlx::{Executor, Sqlite, SqlitePool, sqlite::SqliteRow};

use keel::meta_adapter::{KeyValueFilter, KeyValueView, OwnerRef, SaveKeyValue};
use keel::prelude::*;

use crate::utils::*;

fn key_value_from_row(row: &SqliteRow, with_owner: bool) -> ClResult<KeyValueView> {
	let owner = if with_owner {
		let uuid: Option<Box<str>> = get(row, "owner_uuid")?;
		let name: Option<Box<str>> = get(row, "owner_name")?;
		uuid.map(|uuid| OwnerRef { uuid, name: name.unwrap_or_default() })
	} else {
		None
	};
	let value: Option<Box<str>> = get(row, "value")?;

	Ok(KeyValueView {
		uuid: get(row, "uuid")?,
		key: get(row, "key_name")?,
		value: value.unwrap_or_default(),
		updated_at: Timestamp(get(row, "updated_at")?),
		owner,
	})
}

async fn read(db: &SqlitePool, uuid: &str) -> ClResult<KeyValueView> {
	let res = sqlx::query(
		"SELECT kv.uuid, kv.key_name, kv.value, kv.updated_at, u.uuid AS owner_uuid, u.name AS owner_name
		FROM key_values kv LEFT JOIN users u ON u.user_id=kv.user_id
		WHERE kv.uuid=?",
	)
	.bind(uuid)
	.fetch_one(db)
	.await;

	map_res(res, |row| key_value_from_row(&row, true))
}

pub(crate) async fn save(db: &SqlitePool, kv: &SaveKeyValue<'_>) -> ClResult<KeyValueView> {
	if kv.is_update {
		let uuid = kv.uuid.ok_or(Error::NotFound)?;

		let mut query = sqlx::QueryBuilder::new("UPDATE key_values SET key_name=");
		query.push_bind(kv.key).push(", value=").push_bind(kv.value);
		if let Some(owner_id) = kv.owner_id {
			query.push(", user_id=").push_bind(owner_id);
		}
		query.push(", updated_at=unixepoch() WHERE uuid=").push_bind(uuid);

		let res = query.build().execute(db).await.map_err(map_write_err)?;
		if res.rows_affected() == 0 {
			return Err(Error::NotFound);
		}
		return read(db, uuid).await;
	}

	let existing = sqlx::query("SELECT kv_id FROM key_values WHERE coalesce(user_id, 0)=? AND key_name=?")
		.bind(kv.owner_id.unwrap_or(0))
		.bind(kv.key)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	if existing.is_some() {
		return Err(Error::DuplicateResource);
	}

	let uuid = keel::utils::new_uuid();
	sqlx::query("INSERT INTO key_values (uuid, key_name, value, user_id) VALUES (?, ?, ?, ?)")
		.bind(&uuid)
		.bind(kv.key)
		.bind(kv.value)
		.bind(kv.owner_id)
		.execute(db)
		.await
		.map_err(map_write_err)?;

	read(db, &uuid).await
}

pub(crate) async fn list(db: &SqlitePool, filter: &KeyValueFilter) -> ClResult<Vec<KeyValueView>> {
	if filter.keys.is_empty() {
		return Ok(Vec::new());
	}
	let scoped = !filter.skip_owner_scoping && !filter.owner_uuids.is_empty();

	let mut query = sqlx::QueryBuilder::new("SELECT kv.uuid, kv.key_name, kv.value, kv.updated_at");
	if scoped {
		query.push(
			", u.uuid AS owner_uuid, u.name AS owner_name \
			FROM key_values kv JOIN users u ON u.user_id=kv.user_id",
		);
	} else {
		query.push(" FROM key_values kv");
	}
	query.push(" WHERE 1=1");

	if let Some(names) = filter.keys.names() {
		query.push(" AND kv.key_name IN ");
		push_in(&mut query, names);
	}
	if scoped {
		query.push(" AND u.uuid IN ");
		push_in(&mut query, filter.owner_uuids.iter().map(AsRef::<str>::as_ref));
	}
	// Ownerless records first, so a literal key lookup prefers the global record
	query.push(" ORDER BY kv.user_id IS NOT NULL, kv.kv_id");

	let rows = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	rows.iter().map(|row| key_value_from_row(row, scoped)).collect()
}

pub(crate) async fn delete(db: &SqlitePool, uuid: &str) -> ClResult<()> {
	let res = sqlx::query("DELETE FROM key_values WHERE uuid=?")
		.bind(uuid)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// Deletes every record owned by a user. Deleting nothing is not an error.
pub(crate) async fn delete_for_owner<'e, E>(executor: E, user_id: i64) -> ClResult<u64>
where
	E: Executor<'e, Database = Sqlite>,
{
	let res = sqlx::query("DELETE FROM key_values WHERE user_id=?")
		.bind(user_id)
		.execute(executor)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	Ok(res.rows_affected())
}

// vim: ts=4
