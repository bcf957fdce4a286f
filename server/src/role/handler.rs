use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use super::validate_role_name;
use crate::meta_adapter::{CreateRole, Role, UpdateRole};
use crate::prelude::*;

/// # GET /api/v1/role
pub async fn list_roles(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<Vec<Role>>>)> {
	let roles = app.meta_adapter.list_roles().await?;

	let response = ApiResponse::new(ResponseCode::FetchSuccess, roles)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

/// # POST /api/v1/role
#[derive(Debug, Deserialize)]
pub struct PostRoleReq {
	name: String,
	description: Option<String>,
	enabled: Option<bool>,
	#[serde(default)]
	permissions: Vec<Box<str>>,
}

pub async fn post_role(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Json(req): Json<PostRoleReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<Role>>)> {
	validate_role_name(&req.name)?;
	let permissions = app.permissions.validate(&req.permissions)?;

	let role = app
		.meta_adapter
		.create_role(&CreateRole {
			name: &req.name,
			description: req.description.as_deref().filter(|d| !d.is_empty()),
			enabled: req.enabled.unwrap_or(true),
			permissions: &permissions,
		})
		.await?;
	info!(by = %auth.username, "created role {} {:?}", role.name, role.permissions);

	let response = ApiResponse::new(ResponseCode::ResourceCreated, role)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::CREATED, Json(response)))
}

/// # PUT /api/v1/role/{uuid}
#[derive(Debug, Deserialize)]
pub struct PutRoleReq {
	name: Option<String>,
	#[serde(default)]
	description: Patch<String>,
	enabled: Option<bool>,
	permissions: Option<Vec<Box<str>>>,
}

pub async fn put_role(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(uuid): Path<String>,
	Json(req): Json<PutRoleReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<Role>>)> {
	if let Some(name) = &req.name {
		validate_role_name(name)?;
	}
	let permissions = match &req.permissions {
		Some(permissions) => Some(app.permissions.validate(permissions)?),
		None => None,
	};

	let update = UpdateRole {
		name: req.name.map(Into::into),
		description: req.description.map(Into::into),
		enabled: req.enabled,
		permissions,
	};
	let role = app.meta_adapter.update_role(&uuid, &update).await?;
	info!(by = %auth.username, "updated role {} {:?}", role.name, role.permissions);

	let response = ApiResponse::new(ResponseCode::ResourceUpdated, role)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

/// # DELETE /api/v1/role/{uuid}
pub async fn delete_role(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(uuid): Path<String>,
) -> ClResult<(StatusCode, Json<ApiResponse<()>>)> {
	app.meta_adapter.delete_role(&uuid).await?;
	info!(by = %auth.username, "deleted role {}", uuid);

	let response = ApiResponse::new(ResponseCode::ResourceDeleted, ())
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
