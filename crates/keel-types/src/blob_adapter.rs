//! Adapter that stores uploaded file content under slash separated keys
use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait BlobAdapter: Debug + Send + Sync {
	/// Stores a blob under `key` (e.g. `2024/05/abc.png`), replacing any previous content
	async fn put_blob(&self, key: &str, data: &[u8], content_type: &str) -> ClResult<()>;

	/// Returns the size of a blob, or `None` if it does not exist
	async fn stat_blob(&self, key: &str) -> Option<u64>;

	/// Reads a whole blob
	async fn read_blob(&self, key: &str) -> ClResult<Box<[u8]>>;

	/// Removes a blob
	async fn delete_blob(&self, key: &str) -> ClResult<()>;
}

// vim: ts=4
