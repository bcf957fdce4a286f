//! Database schema initialization

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS vars (
			key text NOT NULL,
			value text,
			PRIMARY KEY(key)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Roles
	//*******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS roles (
		role_id integer PRIMARY KEY AUTOINCREMENT,
		uuid text NOT NULL,
		name text NOT NULL COLLATE NOCASE,
		description text,
		enabled boolean NOT NULL DEFAULT 1,
		permissions json NOT NULL DEFAULT '[]',
		created_at datetime DEFAULT (unixepoch()),
		updated_at datetime DEFAULT (unixepoch())
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_roles_uuid ON roles(uuid)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_roles_name ON roles(name)")
		.execute(&mut *tx)
		.await?;

	// Users
	//*******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS users (
		user_id integer PRIMARY KEY AUTOINCREMENT,
		uuid text NOT NULL,
		kind char(1) NOT NULL DEFAULT 'U',
		username text NOT NULL,
		password text NOT NULL,
		name text NOT NULL,
		email text NOT NULL,
		contact_number text,
		enabled boolean NOT NULL DEFAULT 1,
		role_id integer REFERENCES roles(role_id) ON DELETE SET NULL,
		created_at datetime DEFAULT (unixepoch()),
		updated_at datetime DEFAULT (unixepoch())
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_uuid ON users(uuid)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(username)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_role ON users(role_id)")
		.execute(&mut *tx)
		.await?;

	// Key-values
	//************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS key_values (
		kv_id integer PRIMARY KEY AUTOINCREMENT,
		uuid text NOT NULL,
		key_name text NOT NULL,
		value text,
		user_id integer REFERENCES users(user_id),
		updated_at datetime DEFAULT (unixepoch())
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_key_values_uuid ON key_values(uuid)")
		.execute(&mut *tx)
		.await?;
	// One key per owner, ownerless records share the 0 scope
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_key_values_owner_key
		ON key_values(coalesce(user_id, 0), key_name)",
	)
	.execute(&mut *tx)
	.await?;

	// Contact messages
	//******************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS contact_messages (
		msg_id integer PRIMARY KEY AUTOINCREMENT,
		uuid text NOT NULL,
		name text NOT NULL,
		email text NOT NULL,
		contact_number text,
		message text NOT NULL,
		user_id integer REFERENCES users(user_id) ON DELETE SET NULL,
		created_at datetime DEFAULT (unixepoch())
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_contact_messages_uuid ON contact_messages(uuid)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
