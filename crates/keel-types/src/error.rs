//! Error type shared by every Keel crate.
//!
//! Each kind maps to a stable response code and an HTTP status, so handlers can
//! simply propagate with `?` and let [`IntoResponse`] render the envelope.

use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::types::{ApiResponse, ResponseCode};

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	DuplicateResource,
	PermissionDenied,
	Unauthorized,
	ValidationError(String),
	DbError,
	Parse,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	pub fn response_code(&self) -> ResponseCode {
		match self {
			Error::NotFound => ResponseCode::NotFound,
			Error::DuplicateResource => ResponseCode::DuplicateResource,
			Error::PermissionDenied => ResponseCode::PermissionDenied,
			Error::Unauthorized => ResponseCode::Unauthorized,
			Error::ValidationError(_) => ResponseCode::ValidationFailed,
			Error::Parse => ResponseCode::BadRequest,
			Error::DbError | Error::Internal(_) | Error::Io(_) => ResponseCode::InternalError,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(_err: serde_json::Error) -> Self {
		Self::Parse
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::ValidationError(msg) => write!(f, "validation failed: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "I/O error: {}", err),
			_ => write!(f, "{:?}", self),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let code = self.response_code();
		let status = code.status();
		if status == StatusCode::INTERNAL_SERVER_ERROR {
			tracing::error!("request failed: {}", self);
		}
		let payload = match self {
			Error::ValidationError(msg) => serde_json::json!({ "message": msg }),
			_ => serde_json::json!({}),
		};
		(status, Json(ApiResponse::new(code, payload))).into_response()
	}
}


// vim: ts=4
