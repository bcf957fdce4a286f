//! Shared utilities for SQLite adapter
//!
//! Helper functions, macros, and error mapping used across the domain modules.

use keel::prelude::*;
use sqlx::sqlite::SqliteRow;

/// Applies a Patch field to an UPDATE query with proper binding.
/// Returns true if the field was added (for tracking has_updates)
macro_rules! push_patch {
	($query:expr, $has_updates:expr, $field:literal, $patch:expr) => {{
		match $patch {
			Patch::Undefined => $has_updates,
			Patch::Null => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=NULL"));
				true
			}
			Patch::Value(v) => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=")).push_bind(v);
				true
			}
		}
	}};
}

/// Same as `push_patch!` for plain `Option` fields (None leaves the column untouched)
macro_rules! push_opt {
	($query:expr, $has_updates:expr, $field:literal, $opt:expr) => {{
		match $opt {
			None => $has_updates,
			Some(v) => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=")).push_bind(v);
				true
			}
		}
	}};
}

pub(crate) use push_opt;
pub(crate) use push_patch;

/// Build an IN clause with parameterized values
pub(crate) fn push_in<'a, T>(
	query: &mut sqlx::QueryBuilder<'a, sqlx::Sqlite>,
	values: impl IntoIterator<Item = T>,
) where
	T: 'a + sqlx::Encode<'a, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
	query.push("(");
	let mut separated = query.separated(", ");
	for value in values {
		separated.push_bind(value);
	}
	separated.push_unseparated(")");
}

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> ClResult<T>,
{
	match row {
		Ok(row) => f(row),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Translates a failed write; unique constraint violations become `DuplicateResource`
pub(crate) fn map_write_err(err: sqlx::Error) -> Error {
	if let sqlx::Error::Database(db_err) = &err {
		if db_err.is_unique_violation() {
			debug!("DB: unique violation: {}", db_err.message());
			return Error::DuplicateResource;
		}
	}
	inspect(&err);
	Error::DbError
}

/// Column getter that maps decode failures to `DbError`
pub(crate) fn get<'r, T>(row: &'r SqliteRow, col: &str) -> ClResult<T>
where
	T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
	use sqlx::Row;
	row.try_get(col).inspect_err(inspect).map_err(|_| Error::DbError)
}

// vim: ts=4
