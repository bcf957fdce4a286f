//! Common types used throughout Keel.

use axum::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::skip_serializing_none;
use std::time::SystemTime;

// Timestamp //
//***********//
/// Unix timestamp in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(res.as_secs() as i64)
	}

	pub fn from_now(delta: i64) -> Timestamp {
		Timestamp(Self::now().0 + delta)
	}

	/// RFC 3339 representation in UTC (`2024-05-01T12:00:00+00:00`)
	pub fn to_rfc3339(self) -> String {
		chrono::DateTime::from_timestamp(self.0, 0).unwrap_or_default().to_rfc3339()
	}

	/// Year and zero-padded month, used for date-partitioned storage paths
	pub fn year_month(self) -> (String, String) {
		let dt = chrono::DateTime::from_timestamp(self.0, 0).unwrap_or_default();
		(dt.format("%Y").to_string(), dt.format("%m").to_string())
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

/// Serialize a timestamp as an RFC 3339 string
pub fn serialize_timestamp_iso<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&ts.to_rfc3339())
}

// Patch //
//*******//
/// Three-state field for partial updates: absent, explicitly null, or a value
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	pub fn as_option(&self) -> Option<&T> {
		match self {
			Patch::Value(v) => Some(v),
			_ => None,
		}
	}

	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
		match self {
			Patch::Undefined => Patch::Undefined,
			Patch::Null => Patch::Null,
			Patch::Value(v) => Patch::Value(f(v)),
		}
	}
}

/// A JSON `null` becomes `Null`; use `#[serde(default)]` so a missing field stays `Undefined`
impl<'de, T> Deserialize<'de> for Patch<T>
where
	T: Deserialize<'de>,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(match Option::<T>::deserialize(deserializer)? {
			Some(v) => Patch::Value(v),
			None => Patch::Null,
		})
	}
}

impl<T> From<Option<T>> for Patch<T> {
	fn from(value: Option<T>) -> Self {
		match value {
			Some(v) => Patch::Value(v),
			None => Patch::Undefined,
		}
	}
}

// ResponseCode //
//**************//
/// Machine readable outcome carried in every response envelope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCode {
	FetchSuccess,
	ResourceCreated,
	ResourceUpdated,
	ResourceDeleted,
	AuthSuccessful,
	LoggedOut,
	MessageReceived,
	FileUploaded,
	NotFound,
	DuplicateResource,
	PermissionDenied,
	Unauthorized,
	ValidationFailed,
	BadRequest,
	InternalError,
}

impl ResponseCode {
	pub fn status(self) -> StatusCode {
		match self {
			ResponseCode::FetchSuccess
			| ResponseCode::ResourceUpdated
			| ResponseCode::ResourceDeleted
			| ResponseCode::AuthSuccessful
			| ResponseCode::LoggedOut => StatusCode::OK,
			ResponseCode::ResourceCreated
			| ResponseCode::MessageReceived
			| ResponseCode::FileUploaded => StatusCode::CREATED,
			ResponseCode::NotFound => StatusCode::NOT_FOUND,
			ResponseCode::DuplicateResource => StatusCode::CONFLICT,
			ResponseCode::PermissionDenied => StatusCode::FORBIDDEN,
			ResponseCode::Unauthorized => StatusCode::UNAUTHORIZED,
			ResponseCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
			ResponseCode::BadRequest => StatusCode::BAD_REQUEST,
			ResponseCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

// ApiResponse //
//*************//
/// Response envelope: `{response_code, http_status_code, timestamp, payload}`
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
	pub response_code: ResponseCode,
	pub http_status_code: u16,
	pub timestamp: String,
	pub payload: T,
	pub req_id: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn new(response_code: ResponseCode, payload: T) -> Self {
		Self {
			response_code,
			http_status_code: response_code.status().as_u16(),
			timestamp: Timestamp::now().to_rfc3339(),
			payload,
			req_id: None,
		}
	}

	pub fn with_req_id(mut self, req_id: impl Into<String>) -> Self {
		let req_id = req_id.into();
		if !req_id.is_empty() {
			self.req_id = Some(req_id);
		}
		self
	}
}

// Pagination //
//************//
pub const DEFAULT_PAGE_SIZE: u32 = 30;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Normalized 1-indexed page request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
	pub page: u32,
	pub limit: u32,
}

impl PageRequest {
	/// Missing or zero values fall back to page 1 and the default page size
	pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
		let page = page.filter(|p| *p > 0).unwrap_or(1);
		let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
		Self { page, limit }
	}

	pub fn offset(&self) -> u64 {
		u64::from(self.page - 1) * u64::from(self.limit)
	}
}

impl Default for PageRequest {
	fn default() -> Self {
		Self::new(None, None)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
	pub total_item_count: u64,
	pub total_page_count: u64,
	pub items_per_page: u32,
	pub current_page: u32,
	pub current_page_items_count: usize,
	pub has_next_page: bool,
}

impl PaginationInfo {
	pub fn new(total_item_count: u64, req: PageRequest, current_page_items_count: usize) -> Self {
		let total_page_count = total_item_count.div_ceil(u64::from(req.limit));
		Self {
			total_item_count,
			total_page_count,
			items_per_page: req.limit,
			current_page: req.page,
			current_page_items_count,
			has_next_page: u64::from(req.page) < total_page_count,
		}
	}
}

/// One page of items plus its pagination metadata
#[derive(Clone, Debug, Serialize)]
pub struct Paginated<T> {
	pub items: Vec<T>,
	pub pagination: PaginationInfo,
}

impl<T> Paginated<T> {
	pub fn new(items: Vec<T>, total_item_count: u64, req: PageRequest) -> Self {
		let pagination = PaginationInfo::new(total_item_count, req, items.len());
		Self { items, pagination }
	}
}


// vim: ts=4
