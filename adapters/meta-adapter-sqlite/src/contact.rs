//! Contact messages

use sqlx::{SqlitePool, sqlite::SqliteRow};

use keel::meta_adapter::{ContactMessage, CreateContactMessage, OwnerRef};
use keel::prelude::*;
use keel::types::PageRequest;

use crate::utils::*;

const MESSAGE_SELECT: &str = "SELECT m.uuid, m.name, m.email, m.contact_number, m.message, \
	m.created_at, u.uuid AS user_uuid, u.name AS user_name \
	FROM contact_messages m LEFT JOIN users u ON u.user_id=m.user_id";

fn message_from_row(row: &SqliteRow) -> ClResult<ContactMessage> {
	let user_uuid: Option<Box<str>> = get(row, "user_uuid")?;
	let user_name: Option<Box<str>> = get(row, "user_name")?;

	Ok(ContactMessage {
		uuid: get(row, "uuid")?,
		name: get(row, "name")?,
		email_address: get(row, "email")?,
		contact_number: get(row, "contact_number")?,
		message: get(row, "message")?,
		submitted_by: user_uuid.map(|uuid| OwnerRef { uuid, name: user_name.unwrap_or_default() }),
		created_at: Timestamp(get(row, "created_at")?),
	})
}

pub(crate) async fn create(
	db: &SqlitePool,
	msg: &CreateContactMessage<'_>,
) -> ClResult<ContactMessage> {
	let uuid = keel::utils::new_uuid();

	sqlx::query(
		"INSERT INTO contact_messages (uuid, name, email, contact_number, message, user_id)
		VALUES (?, ?, ?, ?, ?, ?)",
	)
	.bind(&uuid)
	.bind(msg.name)
	.bind(msg.email)
	.bind(msg.contact_number)
	.bind(msg.message)
	.bind(msg.user_id)
	.execute(db)
	.await
	.map_err(map_write_err)?;

	let res = sqlx::query(&format!("{} WHERE m.uuid=?", MESSAGE_SELECT))
		.bind(&uuid)
		.fetch_one(db)
		.await;
	map_res(res, |row| message_from_row(&row))
}

/// Newest first
pub(crate) async fn list(
	db: &SqlitePool,
	page: PageRequest,
) -> ClResult<(Vec<ContactMessage>, u64)> {
	let res = sqlx::query("SELECT count(*) AS cnt FROM contact_messages").fetch_one(db).await;
	let total: i64 = map_res(res, |row| get(&row, "cnt"))?;

	let rows = sqlx::query(&format!("{} ORDER BY m.msg_id DESC LIMIT ? OFFSET ?", MESSAGE_SELECT))
		.bind(i64::from(page.limit))
		.bind(page.offset() as i64)
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	let messages = rows.iter().map(message_from_row).collect::<ClResult<Vec<_>>>()?;

	Ok((messages, total as u64))
}

// vim: ts=4
