//! App state type

use std::sync::Arc;

use keel_types::blob_adapter::BlobAdapter;
use keel_types::meta_adapter::MetaAdapter;
use keel_types::worker::WorkerPool;

use crate::crypto::JwtKeys;
use crate::permission::PermissionRegistry;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunMode {
	#[default]
	Production,
	Development,
}

pub struct AppState {
	pub worker: Arc<WorkerPool>,
	pub opts: AppBuilderOpts,
	pub permissions: PermissionRegistry,
	pub jwt: JwtKeys,

	pub meta_adapter: Arc<dyn MetaAdapter>,
	pub blob_adapter: Arc<dyn BlobAdapter>,
}

pub type App = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub mode: RunMode,
	pub listen: Box<str>,
	/// Access token lifetime in hours
	pub token_expiry: u32,
	/// Allowed CORS origins, empty for same-origin only
	pub cors_origins: Box<[Box<str>]>,
	/// Public base URL of uploaded files
	pub upload_base_url: Box<str>,
	/// Storage key prefix of uploads (`dev` in development mode)
	pub upload_prefix: Option<Box<str>>,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self {
			mode: RunMode::Production,
			listen: "127.0.0.1:8080".into(),
			token_expiry: 8,
			cors_origins: Box::default(),
			upload_base_url: "/files".into(),
			upload_prefix: None,
		}
	}
}

// vim: ts=4
