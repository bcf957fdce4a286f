use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{
	UserView, normalize_contact_number, validate_email_address, validate_name, validate_password,
	validate_username,
};
use crate::filter::{KeySelector, parse_str_list, parse_user_search};
use crate::meta_adapter::{ActorKind, CreateUser, KeyValueFilter, ListUserOptions, UpdateUser};
use crate::prelude::*;
use crate::types::{PageRequest, Paginated};
use keel_core::crypto;

/// Resolves a role name to its id, an unknown role is a validation error
pub(crate) async fn resolve_role_id(app: &App, name: &str) -> ClResult<i64> {
	match app.meta_adapter.read_role_by_name(name).await {
		Ok(role) => Ok(role.role_id),
		Err(Error::NotFound) => Err(Error::ValidationError(format!("unknown role: {}", name))),
		Err(err) => Err(err),
	}
}

/// Merges the selected key-value records into the views, with one lookup
/// over all of their owners
async fn merge_key_values(app: &App, views: &mut [UserView], keys: Option<&str>) -> ClResult<()> {
	let selector = KeySelector::resolve(None, keys);
	if views.is_empty() || selector.is_empty() {
		return Ok(());
	}

	let filter = KeyValueFilter {
		keys: selector,
		owner_uuids: views.iter().map(|view| view.uuid.clone()).collect(),
		skip_owner_scoping: false,
	};
	let records = app.meta_adapter.list_key_values(&filter).await?;

	let index: HashMap<Box<str>, usize> =
		views.iter().enumerate().map(|(idx, view)| (view.uuid.clone(), idx)).collect();
	for record in &records {
		let Some(idx) = record.owner.as_ref().and_then(|owner| index.get(&owner.uuid)) else {
			continue;
		};
		views[*idx].merge_key_value(&record.key, &record.value);
	}
	Ok(())
}

/// # GET /api/v1/user
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
	q: Option<String>,
	role: Option<String>,
	uuid: Option<String>,
	enabled: Option<bool>,
	key_value: Option<String>,
	page: Option<u32>,
	limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UserListing {
	One(UserView),
	Page(Paginated<UserView>),
}

pub async fn list_users(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	Query(query): Query<ListUsersQuery>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserListing>>)> {
	let key_value = query.key_value.as_deref();

	let listing = if let Some(uuid) = query.uuid.as_deref().filter(|uuid| !uuid.is_empty()) {
		let actor = app.meta_adapter.read_user(uuid).await?;
		let mut views = [UserView::from(&actor)];
		merge_key_values(&app, &mut views, key_value).await?;
		let [view] = views;
		UserListing::One(view)
	} else {
		let opts = ListUserOptions {
			search: query.q.as_deref().and_then(parse_user_search),
			roles: query.role.as_deref().map(parse_str_list).unwrap_or_default(),
			enabled: query.enabled,
			page: PageRequest::new(query.page, query.limit),
		};
		let (actors, total) = app.meta_adapter.list_users(&opts).await?;
		let mut views: Vec<UserView> = actors.iter().map(UserView::from).collect();
		merge_key_values(&app, &mut views, key_value).await?;
		UserListing::Page(Paginated::new(views, total, opts.page))
	};

	let response = ApiResponse::new(ResponseCode::FetchSuccess, listing)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

/// # POST /api/v1/user
#[derive(Debug, Deserialize)]
pub struct PostUserReq {
	/// Defaults to the email address
	username: Option<String>,
	password: String,
	name: String,
	email_address: String,
	contact_number: Option<String>,
	enabled: Option<bool>,
	kind: Option<ActorKind>,
	/// Role name
	role: Option<String>,
}

pub async fn post_user(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Json(req): Json<PostUserReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let email = req.email_address.trim();
	let username = req.username.as_deref().map_or(email, str::trim);
	validate_username(username)?;
	validate_password(&req.password)?;
	validate_name(&req.name)?;
	validate_email_address(email)?;
	let contact_number = normalize_contact_number(req.contact_number.as_deref())?;

	let role_id = match req.role.as_deref().filter(|role| !role.is_empty()) {
		Some(role) => Some(resolve_role_id(&app, role).await?),
		None => None,
	};

	let password_hash = crypto::generate_password_hash(&app.worker, req.password.into()).await?;
	let actor = app
		.meta_adapter
		.create_user(&CreateUser {
			username,
			password_hash: &password_hash,
			name: req.name.trim(),
			email,
			contact_number: contact_number.as_deref(),
			enabled: req.enabled.unwrap_or(true),
			kind: req.kind.unwrap_or_default(),
			role_id,
		})
		.await?;
	info!(by = %auth.username, "created user {}", actor.username);

	let response = ApiResponse::new(ResponseCode::ResourceCreated, UserView::from(&actor))
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::CREATED, Json(response)))
}

/// # PUT /api/v1/user/{uuid}
#[derive(Debug, Default, Deserialize)]
pub struct PutUserReq {
	name: Option<String>,
	email_address: Option<String>,
	#[serde(default)]
	contact_number: Patch<String>,
	enabled: Option<bool>,
	kind: Option<ActorKind>,
	/// Role name, `null` removes the role
	#[serde(default)]
	role: Patch<String>,
	/// Empty or missing keeps the current password
	password: Option<String>,
}

pub async fn put_user(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(uuid): Path<String>,
	Json(req): Json<PutUserReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let mut update = UpdateUser::default();

	if let Some(name) = &req.name {
		validate_name(name)?;
		update.name = Some(name.trim().into());
	}
	if let Some(email) = &req.email_address {
		validate_email_address(email.trim())?;
		update.email = Some(email.trim().into());
	}
	update.contact_number = match &req.contact_number {
		Patch::Undefined => Patch::Undefined,
		Patch::Null => Patch::Null,
		Patch::Value(contact_number) => match normalize_contact_number(Some(contact_number))? {
			Some(contact_number) => Patch::Value(contact_number),
			None => Patch::Null,
		},
	};
	update.enabled = req.enabled;
	update.kind = req.kind;
	update.role_id = match &req.role {
		Patch::Undefined => Patch::Undefined,
		Patch::Value(role) if !role.is_empty() => {
			Patch::Value(resolve_role_id(&app, role).await?)
		}
		Patch::Null | Patch::Value(_) => Patch::Null,
	};
	if let Some(password) = req.password.filter(|password| !password.is_empty()) {
		validate_password(&password)?;
		update.password_hash =
			Some(crypto::generate_password_hash(&app.worker, password.into()).await?);
	}

	let actor = app.meta_adapter.update_user(&uuid, &update).await?;
	info!(by = %auth.username, "updated user {}", actor.username);

	let response = ApiResponse::new(ResponseCode::ResourceUpdated, UserView::from(&actor))
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

/// # DELETE /api/v1/user/{uuid}
pub async fn delete_user(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(uuid): Path<String>,
) -> ClResult<(StatusCode, Json<ApiResponse<()>>)> {
	if *auth.uuid == *uuid {
		return Err(Error::ValidationError("cannot delete the current user".into()));
	}
	app.meta_adapter.delete_user(&uuid).await?;
	info!(by = %auth.username, "deleted user {}", uuid);

	let response = ApiResponse::new(ResponseCode::ResourceDeleted, ())
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
