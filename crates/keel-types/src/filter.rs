//! Query filter parsing shared by the key-value and user listings

use serde::Serialize;

use crate::meta_adapter::{KeyValueView, UserSearch};

pub const ALL_KEYS: &str = "all";

/// Which key names a key-value lookup selects
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySelector {
	/// A literal `key`, answered with a single record
	One(Box<str>),
	/// A key list, answered with a list (an empty list selects nothing)
	Many(Vec<Box<str>>),
	/// No key filter
	All,
}

impl KeySelector {
	/// Resolves the `key` and `keys` parameters. A non-empty `key` wins over
	/// `keys`, and `"all"` is recognized before a list is built.
	pub fn resolve(key: Option<&str>, keys: Option<&str>) -> Self {
		if let Some(key) = key.filter(|k| !k.is_empty()) {
			if key == ALL_KEYS {
				return KeySelector::All;
			}
			return KeySelector::One(key.into());
		}

		let keys = keys.map(parse_str_list).unwrap_or_default();
		if keys.iter().any(|k| &**k == ALL_KEYS) {
			KeySelector::All
		} else {
			KeySelector::Many(keys)
		}
	}

	/// Key names to match, `None` when unrestricted
	pub fn names(&self) -> Option<Vec<&str>> {
		match self {
			KeySelector::One(key) => Some(vec![&**key]),
			KeySelector::Many(keys) => Some(keys.iter().map(AsRef::as_ref).collect()),
			KeySelector::All => None,
		}
	}

	/// True if the selector can never match anything
	pub fn is_empty(&self) -> bool {
		matches!(self, KeySelector::Many(keys) if keys.is_empty())
	}
}

/// Splits a comma separated list, stripping all whitespace and dropping empty items
pub fn parse_str_list(s: &str) -> Vec<Box<str>> {
	s.split(',')
		.map(|item| item.chars().filter(|c| !c.is_whitespace()).collect::<String>())
		.filter(|item| !item.is_empty())
		.map(String::into_boxed_str)
		.collect()
}

/// Key-value lookup result: a single record for a literal key, a list otherwise
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum KeyValueResult {
	Single(KeyValueView),
	List(Vec<KeyValueView>),
}

impl KeyValueResult {
	pub fn from_rows(selector: &KeySelector, mut rows: Vec<KeyValueView>) -> Self {
		match selector {
			KeySelector::One(_) if !rows.is_empty() => KeyValueResult::Single(rows.swap_remove(0)),
			_ => KeyValueResult::List(rows),
		}
	}

	pub fn is_empty(&self) -> bool {
		match self {
			KeyValueResult::Single(_) => false,
			KeyValueResult::List(rows) => rows.is_empty(),
		}
	}
}

/// Parses the free text user filter. `#` prefixed queries match the numeric id
/// after all non-digit characters are removed.
pub fn parse_user_search(q: &str) -> Option<UserSearch> {
	if q.is_empty() {
		return None;
	}
	if let Some(rest) = q.strip_prefix('#') {
		let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
		return Some(match digits.parse::<i64>() {
			Ok(id) => UserSearch::Id(id),
			Err(_) => UserSearch::NoMatch,
		});
	}
	Some(UserSearch::Name(q.into()))
}


// vim: ts=4
