//! Global variables (e.g. the generated token secret)

use sqlx::SqlitePool;

use keel::prelude::*;

use crate::utils::*;

pub(crate) async fn read(db: &SqlitePool, key: &str) -> ClResult<Option<Box<str>>> {
	let row = sqlx::query("SELECT value FROM vars WHERE key=?")
		.bind(key)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	match row {
		Some(row) => get(&row, "value"),
		None => Ok(None),
	}
}

pub(crate) async fn update(db: &SqlitePool, key: &str, value: &str) -> ClResult<()> {
	sqlx::query("INSERT OR REPLACE INTO vars (key, value) VALUES (?, ?)")
		.bind(key)
		.bind(value)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	Ok(())
}

// vim: ts=4
