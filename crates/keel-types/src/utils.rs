//! Utility functions

use rand::RngExt;
use regex::Regex;
use std::sync::LazyLock;

use crate::prelude::*;

pub const SAFE: [char; 62] = [
	'0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
	'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
	'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
	'V', 'W', 'X', 'Y', 'Z',
];

pub const KEY_NAME_MAX: usize = 40;
pub const VALUE_MAX: usize = 50_000;

static EMAIL_RE: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Random string of `len` characters from `[0-9a-zA-Z]`, or `[0-9]` when `digits_only`
pub fn random_string(len: usize, digits_only: bool) -> String {
	let alphabet = if digits_only { &SAFE[..10] } else { &SAFE[..] };
	let mut rng = rand::rng();
	(0..len).map(|_| alphabet[rng.random_range(0..alphabet.len())]).collect()
}

/// Random string with a random length in `min..=max`
pub fn random_string_between(min: usize, max: usize) -> String {
	let len = rand::rng().random_range(min..=max);
	random_string(len, false)
}

/// New random (v4) uuid in hyphenated form
pub fn new_uuid() -> String {
	uuid::Uuid::new_v4().to_string()
}

/// URL-safe lowercase slug. Runs of non-alphanumeric characters collapse into
/// `divider`; non-ASCII letters are dropped. Returns `None` for an empty slug.
///
/// # Examples
/// - `"Hello, World!"` → `"hello-world"`
/// - `"  --  "` → `None`
pub fn slugify(text: &str, divider: char) -> Option<String> {
	let mut slug = String::with_capacity(text.len());
	for ch in text.chars() {
		if ch.is_ascii_alphanumeric() {
			slug.push(ch.to_ascii_lowercase());
		} else if !ch.is_alphanumeric() && !slug.is_empty() && !slug.ends_with(divider) {
			slug.push(divider);
		}
	}
	let slug = slug.trim_end_matches(divider);
	if slug.is_empty() { None } else { Some(slug.to_string()) }
}

/// Strips the usual phone number punctuation: spaces, parentheses, `-` and `_`
pub fn sanitize_phone(value: &str) -> String {
	value.chars().filter(|c| !matches!(c, ' ' | '(' | ')' | '-' | '_')).collect()
}

/// `snake_case` (or any `separator`) to camelCase
pub fn to_camel_case(text: &str, separator: char, capitalize_first: bool) -> String {
	let mut res = String::with_capacity(text.len());
	for word in text.split([separator, ' ']).filter(|w| !w.is_empty()) {
		let mut chars = word.chars();
		if let Some(first) = chars.next() {
			if res.is_empty() && !capitalize_first {
				res.extend(first.to_lowercase());
			} else {
				res.extend(first.to_uppercase());
			}
			res.push_str(chars.as_str());
		}
	}
	res
}

// Validation //
//************//

/// Checks the character count of a field
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> ClResult<()> {
	let len = value.chars().count();
	if len < min || len > max {
		return Err(Error::ValidationError(format!(
			"{} must be between {} and {} characters",
			field, min, max
		)));
	}
	Ok(())
}

pub fn validate_key_name(key: &str) -> ClResult<()> {
	validate_length("key", key, 1, KEY_NAME_MAX)
}

pub fn validate_value(value: &str) -> ClResult<()> {
	validate_length("value", value, 1, VALUE_MAX)
}

pub fn validate_email(field: &str, value: &str) -> ClResult<()> {
	match EMAIL_RE.as_ref() {
		Some(re) if re.is_match(value) => Ok(()),
		_ => Err(Error::ValidationError(format!("{} is not a valid email address", field))),
	}
}


// vim: ts=4
