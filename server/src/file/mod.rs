//! File upload into blob storage

pub mod handler;

use crate::prelude::*;
use crate::utils::random_string_between;

/// Form field carrying the uploaded file
pub const FILE_FIELD: &str = "file";
pub const UPLOAD_MAX_SIZE: usize = 32 * 1024 * 1024;
const FILE_NAME_LEN: (usize, usize) = (36, 64);
const EXTENSION_MAX: usize = 10;

// Utility functions //
//*******************//
pub fn format_from_content_type(content_type: &str) -> Option<&'static str> {
	Some(match content_type {
		// Image
		"image/jpeg" => "jpg",
		"image/png" => "png",
		"image/webp" => "webp",
		"image/avif" => "avif",
		"image/gif" => "gif",
		"image/svg+xml" => "svg",
		// Video
		"video/mp4" => "mp4",
		"video/webm" => "webm",
		// Audio
		"audio/mpeg" => "mp3",
		"audio/ogg" => "ogg",
		// Document
		"application/pdf" => "pdf",
		"application/json" => "json",
		"text/plain" => "txt",
		"text/csv" => "csv",
		_ => None?,
	})
}

pub fn content_type_from_format(format: &str) -> &'static str {
	match format {
		"jpg" | "jpeg" => "image/jpeg",
		"png" => "image/png",
		"webp" => "image/webp",
		"avif" => "image/avif",
		"gif" => "image/gif",
		"svg" => "image/svg+xml",
		"mp4" => "video/mp4",
		"webm" => "video/webm",
		"mp3" => "audio/mpeg",
		"ogg" => "audio/ogg",
		"pdf" => "application/pdf",
		"json" => "application/json",
		"txt" => "text/plain",
		"csv" => "text/csv",
		_ => "application/octet-stream",
	}
}

/// Extension of an uploaded file: the client file name's own extension when
/// it is a short alphanumeric one, otherwise derived from the content type
pub fn file_extension(file_name: Option<&str>, content_type: Option<&str>) -> String {
	let from_name = file_name
		.and_then(|name| name.rsplit_once('.'))
		.map(|(_, ext)| ext.to_ascii_lowercase())
		.filter(|ext| {
			!ext.is_empty()
				&& ext.len() <= EXTENSION_MAX
				&& ext.chars().all(|c| c.is_ascii_alphanumeric())
		});

	from_name
		.or_else(|| content_type.and_then(format_from_content_type).map(ToString::to_string))
		.unwrap_or_else(|| "bin".to_string())
}

/// Storage key of a new upload: `[prefix/]YYYY/MM/<random>.<ext>`
pub fn upload_key(prefix: Option<&str>, now: Timestamp, extension: &str) -> String {
	let (year, month) = now.year_month();
	let name = random_string_between(FILE_NAME_LEN.0, FILE_NAME_LEN.1);
	match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
		Some(prefix) => format!("{}/{}/{}/{}.{}", prefix, year, month, name, extension),
		None => format!("{}/{}/{}.{}", year, month, name, extension),
	}
}


// vim: ts=4
