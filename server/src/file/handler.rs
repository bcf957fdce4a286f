use axum::{
	Json,
	extract::{Multipart, State},
	http::StatusCode,
};
use serde::Serialize;

use super::{FILE_FIELD, content_type_from_format, file_extension, upload_key};
use crate::prelude::*;

#[derive(Debug, Serialize)]
pub struct UploadedFiles {
	/// Storage path of the file, relative to `base_url`
	pub file: Box<str>,
}

#[derive(Debug, Serialize)]
pub struct UploadRes {
	pub base_url: Box<str>,
	pub mime_type: Box<str>,
	pub files: UploadedFiles,
}

struct Upload {
	file_name: Option<String>,
	content_type: Option<String>,
	data: axum::body::Bytes,
}

async fn read_upload(multipart: &mut Multipart) -> ClResult<Option<Upload>> {
	while let Some(field) = multipart.next_field().await.map_err(|err| {
		warn!("multipart: {}", err);
		Error::Parse
	})? {
		if field.name() != Some(FILE_FIELD) {
			continue;
		}
		let file_name = field.file_name().map(ToString::to_string);
		let content_type = field.content_type().map(ToString::to_string);
		let data = field.bytes().await.map_err(|err| {
			warn!("multipart: {}", err);
			Error::Parse
		})?;
		return Ok(Some(Upload { file_name, content_type, data }));
	}
	Ok(None)
}

/// # POST /api/v1/file/upload
pub async fn post_upload(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	mut multipart: Multipart,
) -> ClResult<(StatusCode, Json<ApiResponse<UploadRes>>)> {
	let Some(upload) = read_upload(&mut multipart).await?.filter(|u| !u.data.is_empty()) else {
		return Err(Error::ValidationError("file_not_uploaded".into()));
	};

	let extension = file_extension(upload.file_name.as_deref(), upload.content_type.as_deref());
	let mime_type = upload
		.content_type
		.filter(|c| !c.is_empty() && c != "application/octet-stream")
		.unwrap_or_else(|| content_type_from_format(&extension).to_string());

	let key = upload_key(app.opts.upload_prefix.as_deref(), Timestamp::now(), &extension);
	app.blob_adapter.put_blob(&key, &upload.data, &mime_type).await?;
	info!(by = %auth.username, size = upload.data.len(), "uploaded {}", key);

	let res = UploadRes {
		base_url: app.opts.upload_base_url.clone(),
		mime_type: mime_type.into(),
		files: UploadedFiles { file: format!("/{}", key).into() },
	};
	let response = ApiResponse::new(ResponseCode::FileUploaded, res)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::CREATED, Json(response)))
}

// vim: ts=4
