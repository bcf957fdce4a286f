use axum::{
	Json,
	extract::{Query, State},
	http::StatusCode,
};
use serde::Deserialize;

use super::ContactForm;
use crate::meta_adapter::{ContactMessage, CreateContactMessage};
use crate::prelude::*;
use crate::types::{PageRequest, Paginated};

/// # POST /api/v1/contact-message
#[derive(Debug, Deserialize)]
pub struct ContactMessageReq {
	name: String,
	email_address: String,
	contact_number: Option<String>,
	message: String,
}

pub async fn post_contact_message(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	OptionalRequestId(req_id): OptionalRequestId,
	Json(req): Json<ContactMessageReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<ContactMessage>>)> {
	let form =
		ContactForm::new(&req.name, &req.email_address, req.contact_number.as_deref(), &req.message)?;

	let msg = app
		.meta_adapter
		.create_contact_message(&CreateContactMessage {
			name: &form.name,
			email: &form.email,
			contact_number: form.contact_number.as_deref(),
			message: &form.message,
			user_id: auth.as_ref().map(|actor| actor.user_id),
		})
		.await?;
	info!("contact message {} received", msg.uuid);

	let response = ApiResponse::new(ResponseCode::MessageReceived, msg)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::CREATED, Json(response)))
}

/// # GET /api/v1/contact-message
#[derive(Debug, Default, Deserialize)]
pub struct ListContactMessagesQuery {
	page: Option<u32>,
	limit: Option<u32>,
}

pub async fn list_contact_messages(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	Query(query): Query<ListContactMessagesQuery>,
) -> ClResult<(StatusCode, Json<ApiResponse<Paginated<ContactMessage>>>)> {
	let page = PageRequest::new(query.page, query.limit);
	let (messages, total) = app.meta_adapter.list_contact_messages(page).await?;

	let listing = Paginated::new(messages, total, page);
	let response = ApiResponse::new(ResponseCode::FetchSuccess, listing)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
