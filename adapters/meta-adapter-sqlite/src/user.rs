//! Users (actors), their listing and deletion

use sqlx::{Sqlite, SqlitePool, sqlite::SqliteRow};

use keel::meta_adapter::{
	Actor, ActorKind, CreateUser, ListUserOptions, UpdateUser, UserSearch,
};
use keel::prelude::*;

use crate::role::{ROLE_COLS, role_from_row};
use crate::utils::*;

fn user_select(extra_cols: &str) -> String {
	format!(
		"SELECT u.user_id, u.uuid, u.kind, u.username, u.name, u.email, u.contact_number, \
		u.enabled, u.created_at, u.updated_at, {}{} \
		FROM users u LEFT JOIN roles r ON r.role_id=u.role_id",
		ROLE_COLS, extra_cols
	)
}

fn actor_from_row(row: &SqliteRow) -> ClResult<Actor> {
	let kind: String = get(row, "kind")?;
	Ok(Actor {
		user_id: get(row, "user_id")?,
		uuid: get(row, "uuid")?,
		username: get(row, "username")?,
		name: get(row, "name")?,
		email: get(row, "email")?,
		contact_number: get(row, "contact_number")?,
		enabled: get(row, "enabled")?,
		kind: ActorKind::from_code(&kind).map_err(|_| Error::DbError)?,
		role: role_from_row(row)?,
		created_at: Timestamp(get(row, "created_at")?),
		updated_at: Timestamp(get(row, "updated_at")?),
	})
}

pub(crate) async fn create(db: &SqlitePool, user: &CreateUser<'_>) -> ClResult<Actor> {
	let uuid = keel::utils::new_uuid();

	sqlx::query(
		"INSERT INTO users (uuid, kind, username, password, name, email, contact_number, enabled, role_id)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(&uuid)
	.bind(user.kind.as_code())
	.bind(user.username)
	.bind(user.password_hash)
	.bind(user.name)
	.bind(user.email)
	.bind(user.contact_number)
	.bind(user.enabled)
	.bind(user.role_id)
	.execute(db)
	.await
	.map_err(map_write_err)?;

	read(db, &uuid).await
}

pub(crate) async fn read(db: &SqlitePool, uuid: &str) -> ClResult<Actor> {
	let res = sqlx::query(&format!("{} WHERE u.uuid=?", user_select("")))
		.bind(uuid)
		.fetch_one(db)
		.await;

	map_res(res, |row| actor_from_row(&row))
}

pub(crate) async fn read_by_id(db: &SqlitePool, user_id: i64) -> ClResult<Actor> {
	let res = sqlx::query(&format!("{} WHERE u.user_id=?", user_select("")))
		.bind(user_id)
		.fetch_one(db)
		.await;

	map_res(res, |row| actor_from_row(&row))
}

pub(crate) async fn read_auth(db: &SqlitePool, username: &str) -> ClResult<(Actor, Box<str>)> {
	let res = sqlx::query(&format!("{} WHERE u.username=?", user_select(", u.password")))
		.bind(username)
		.fetch_one(db)
		.await;

	map_res(res, |row| Ok((actor_from_row(&row)?, get(&row, "password")?)))
}

fn push_filters<'a>(query: &mut sqlx::QueryBuilder<'a, Sqlite>, opts: &'a ListUserOptions) {
	query.push(" WHERE 1=1");

	match &opts.search {
		Some(UserSearch::Id(id)) => {
			query.push(" AND u.user_id=").push_bind(*id);
		}
		Some(UserSearch::NoMatch) => {
			query.push(" AND 0");
		}
		Some(UserSearch::Name(name)) => {
			// instr() is case-sensitive, unlike LIKE
			query.push(" AND instr(u.name, ").push_bind(&**name).push(") > 0");
		}
		None => {}
	}

	if !opts.roles.is_empty() {
		query.push(" AND r.name IN ");
		push_in(query, opts.roles.iter().map(AsRef::<str>::as_ref));
	}

	if let Some(enabled) = opts.enabled {
		query.push(" AND u.enabled=").push_bind(enabled);
	}
}

pub(crate) async fn list(db: &SqlitePool, opts: &ListUserOptions) -> ClResult<(Vec<Actor>, u64)> {
	let mut count_query = sqlx::QueryBuilder::new(
		"SELECT count(*) AS cnt FROM users u LEFT JOIN roles r ON r.role_id=u.role_id",
	);
	push_filters(&mut count_query, opts);
	let res = count_query.build().fetch_one(db).await;
	let total: i64 = map_res(res, |row| get(&row, "cnt"))?;

	let mut query = sqlx::QueryBuilder::new(user_select(""));
	push_filters(&mut query, opts);
	query
		.push(" ORDER BY u.user_id DESC LIMIT ")
		.push_bind(i64::from(opts.page.limit))
		.push(" OFFSET ")
		.push_bind(opts.page.offset() as i64);

	let rows = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	let users = rows.iter().map(actor_from_row).collect::<ClResult<Vec<_>>>()?;

	Ok((users, total as u64))
}

pub(crate) async fn update(db: &SqlitePool, uuid: &str, user: &UpdateUser) -> ClResult<Actor> {
	let mut query = sqlx::QueryBuilder::new("UPDATE users SET updated_at=unixepoch()");
	let has_updates = true;
	let has_updates = push_opt!(query, has_updates, "name", &user.name);
	let has_updates = push_opt!(query, has_updates, "email", &user.email);
	let has_updates = push_patch!(query, has_updates, "contact_number", &user.contact_number);
	let has_updates = push_opt!(query, has_updates, "enabled", user.enabled);
	let has_updates = push_opt!(query, has_updates, "kind", user.kind.map(ActorKind::as_code));
	let has_updates = push_patch!(query, has_updates, "role_id", &user.role_id);
	let _ = push_opt!(query, has_updates, "password", &user.password_hash);
	query.push(" WHERE uuid=").push_bind(uuid);

	let res = query.build().execute(db).await.map_err(map_write_err)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	read(db, uuid).await
}

/// Removes the user's key-values, then the user, in one transaction
pub(crate) async fn delete(db: &SqlitePool, uuid: &str) -> ClResult<()> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let res = sqlx::query("SELECT user_id FROM users WHERE uuid=?")
		.bind(uuid)
		.fetch_one(&mut *tx)
		.await;
	let user_id: i64 = map_res(res, |row| get(&row, "user_id"))?;

	let removed = crate::key_value::delete_for_owner(&mut *tx, user_id).await?;
	debug!("deleting user {}: removed {} key-values", uuid, removed);

	sqlx::query("UPDATE contact_messages SET user_id=NULL WHERE user_id=?")
		.bind(user_id)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	sqlx::query("DELETE FROM users WHERE user_id=?")
		.bind(user_id)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(())
}

// vim: ts=4
