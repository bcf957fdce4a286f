use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::Deserialize;

use crate::filter::{KeySelector, KeyValueResult, parse_str_list};
use crate::meta_adapter::{KeyValueFilter, KeyValueView, SaveKeyValue};
use crate::prelude::*;
use crate::utils::{validate_key_name, validate_value};

/// # GET /api/v1/key-value
#[derive(Debug, Default, Deserialize)]
pub struct KeyValueQuery {
	key: Option<String>,
	keys: Option<String>,
	owner_uuid: Option<String>,
}

pub async fn get_key_values(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	Query(query): Query<KeyValueQuery>,
) -> ClResult<(StatusCode, Json<ApiResponse<KeyValueResult>>)> {
	let selector = KeySelector::resolve(query.key.as_deref(), query.keys.as_deref());
	let owner_uuids = query.owner_uuid.as_deref().map(parse_str_list).unwrap_or_default();
	// Unscoped unless the caller asked for specific owners
	let filter = KeyValueFilter {
		keys: selector.clone(),
		skip_owner_scoping: owner_uuids.is_empty(),
		owner_uuids,
	};

	let rows = app.meta_adapter.list_key_values(&filter).await?;
	let result = KeyValueResult::from_rows(&selector, rows);
	if result.is_empty() {
		return Err(Error::NotFound);
	}

	let response = ApiResponse::new(ResponseCode::FetchSuccess, result)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

#[derive(Debug, Deserialize)]
pub struct KeyValueReq {
	key: String,
	value: String,
}

impl KeyValueReq {
	fn validate(&self) -> ClResult<()> {
		validate_key_name(&self.key)?;
		validate_value(&self.value)
	}
}

/// # POST /api/v1/key-value
pub async fn post_key_value(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Json(req): Json<KeyValueReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<KeyValueView>>)> {
	req.validate()?;
	let kv = app
		.meta_adapter
		.save_key_value(&SaveKeyValue {
			key: &req.key,
			value: &req.value,
			owner_id: Some(auth.user_id),
			is_update: false,
			uuid: None,
		})
		.await?;

	let response = ApiResponse::new(ResponseCode::ResourceCreated, kv)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::CREATED, Json(response)))
}

/// # PUT /api/v1/key-value/{uuid}
pub async fn put_key_value(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(uuid): Path<String>,
	Json(req): Json<KeyValueReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<KeyValueView>>)> {
	req.validate()?;
	let kv = app
		.meta_adapter
		.save_key_value(&SaveKeyValue {
			key: &req.key,
			value: &req.value,
			owner_id: Some(auth.user_id),
			is_update: true,
			uuid: Some(&uuid),
		})
		.await?;

	let response = ApiResponse::new(ResponseCode::ResourceUpdated, kv)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

/// # DELETE /api/v1/key-value/{uuid}
pub async fn delete_key_value(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	Path(uuid): Path<String>,
) -> ClResult<(StatusCode, Json<ApiResponse<()>>)> {
	app.meta_adapter.delete_key_value(&uuid).await?;

	let response = ApiResponse::new(ResponseCode::ResourceDeleted, ())
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
