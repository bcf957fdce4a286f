//! Test app builder
//!
//! Every test gets its own SQLite database and blob directory. The TempDir is
//! returned alongside the app so cleanup happens when it is dropped at the end
//! of the test.

use axum::Router;
use std::sync::Arc;
use tempfile::TempDir;

use keel::worker::WorkerPool;
use keel::{App, AppBuilder, RunMode};
use keel_blob_adapter_fs::BlobAdapterFs;
use keel_meta_adapter_sqlite::MetaAdapterSqlite;

pub struct TestApp {
	pub app: App,
	pub router: Router,
	_temp_dir: TempDir,
}

pub async fn create_test_app() -> TestApp {
	create_test_app_with(|_| {}).await
}

pub async fn create_test_app_with(configure: impl FnOnce(&mut AppBuilder)) -> TestApp {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let meta_adapter = MetaAdapterSqlite::new(temp_dir.path().join("meta.db"))
		.await
		.expect("Failed to create meta adapter");
	let blob_adapter = BlobAdapterFs::new(temp_dir.path().join("files").into())
		.await
		.expect("Failed to create blob adapter");

	let mut builder = AppBuilder::new();
	builder
		.mode(RunMode::Development)
		.jwt_secret("test-secret")
		.worker(Arc::new(WorkerPool::new(1, 1)))
		.meta_adapter(Arc::new(meta_adapter))
		.blob_adapter(Arc::new(blob_adapter));
	configure(&mut builder);

	let app = builder.build().await.expect("Failed to build app");
	let router = keel::app::router(&app);
	TestApp { app, router, _temp_dir: temp_dir }
}

// vim: ts=4
