//! App builder - constructs and runs the Keel application

use axum::{
	Router,
	http::{HeaderValue, Method, header},
};
use std::sync::Arc;
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};

use crate::blob_adapter::BlobAdapter;
use crate::meta_adapter::MetaAdapter;
use crate::prelude::*;
use crate::routes;
use crate::worker::WorkerPool;
pub use keel_core::app::{App, AppBuilderOpts, AppState, RunMode, VERSION};
use keel_core::{crypto, middleware, permission::PermissionRegistry};

/// Vars key of the persisted JWT signing secret
const JWT_SECRET_VAR: &str = "jwt_secret";
const DEV_UPLOAD_PREFIX: &str = "dev";

#[derive(Default)]
struct Adapters {
	meta_adapter: Option<Arc<dyn MetaAdapter>>,
	blob_adapter: Option<Arc<dyn BlobAdapter>>,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	worker: Option<Arc<WorkerPool>>,
	jwt_secret: Option<Box<str>>,
	permissions: Vec<(Box<str>, Box<str>)>,
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A second builder in the same process keeps the first subscriber
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppBuilderOpts::default(),
			worker: None,
			jwt_secret: None,
			permissions: Vec::new(),
			adapters: Adapters::default(),
		}
	}

	// Opts
	pub fn mode(&mut self, mode: RunMode) -> &mut Self {
		self.opts.mode = mode;
		self
	}
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn token_expiry(&mut self, hours: u32) -> &mut Self {
		self.opts.token_expiry = hours;
		self
	}
	pub fn cors_origins(
		&mut self,
		origins: impl IntoIterator<Item = impl Into<Box<str>>>,
	) -> &mut Self {
		self.opts.cors_origins = origins.into_iter().map(Into::into).collect();
		self
	}
	pub fn upload_base_url(&mut self, base_url: impl Into<Box<str>>) -> &mut Self {
		self.opts.upload_base_url = base_url.into();
		self
	}
	pub fn upload_prefix(&mut self, prefix: impl Into<Box<str>>) -> &mut Self {
		self.opts.upload_prefix = Some(prefix.into());
		self
	}
	/// Signing secret of the access tokens. Generated and persisted when not set.
	pub fn jwt_secret(&mut self, secret: impl Into<Box<str>>) -> &mut Self {
		self.jwt_secret = Some(secret.into());
		self
	}
	pub fn worker(&mut self, worker: Arc<WorkerPool>) -> &mut Self {
		self.worker = Some(worker);
		self
	}
	/// Registers an application specific permission next to the built-in ones
	pub fn permission(
		&mut self,
		name: impl Into<Box<str>>,
		description: impl Into<Box<str>>,
	) -> &mut Self {
		self.permissions.push((name.into(), description.into()));
		self
	}

	// Adapters
	pub fn meta_adapter(&mut self, meta_adapter: Arc<dyn MetaAdapter>) -> &mut Self {
		self.adapters.meta_adapter = Some(meta_adapter);
		self
	}
	pub fn blob_adapter(&mut self, blob_adapter: Arc<dyn BlobAdapter>) -> &mut Self {
		self.adapters.blob_adapter = Some(blob_adapter);
		self
	}

	/// Validates the configuration and creates the shared application state
	pub async fn build(self) -> ClResult<App> {
		let Some(worker) = self.worker else {
			error!("FATAL: No worker pool defined");
			return Err(Error::Internal("No worker pool defined".to_string()));
		};
		let Some(meta_adapter) = self.adapters.meta_adapter else {
			error!("FATAL: No meta adapter configured");
			return Err(Error::Internal("No meta adapter configured".to_string()));
		};
		let Some(blob_adapter) = self.adapters.blob_adapter else {
			error!("FATAL: No blob adapter configured");
			return Err(Error::Internal("No blob adapter configured".to_string()));
		};

		let mut permissions = PermissionRegistry::new();
		for (name, description) in &self.permissions {
			permissions.register(name, description).inspect_err(|err| {
				error!("FATAL: Cannot register permission {}: {}", name, err);
			})?;
		}
		info!("Registered {} permissions", permissions.iter().count());

		let jwt_secret = match self.jwt_secret {
			Some(secret) => secret,
			None => ensure_jwt_secret(meta_adapter.as_ref()).await?,
		};

		let mut opts = self.opts;
		if opts.mode == RunMode::Development && opts.upload_prefix.is_none() {
			opts.upload_prefix = Some(DEV_UPLOAD_PREFIX.into());
		}

		Ok(Arc::new(AppState {
			worker,
			opts,
			permissions,
			jwt: crypto::JwtKeys::from_secret(&jwt_secret),
			meta_adapter,
			blob_adapter,
		}))
	}

	pub async fn run(self) -> ClResult<()> {
		info!(" _  __         _");
		info!("| |/ /___  ___| |");
		info!("| ' // _ \\/ _ \\ |");
		info!("| . \\  __/  __/ |");
		info!("|_|\\_\\___|\\___|_|");
		info!("V{}", VERSION);
		info!("");

		let app = self.build().await?;
		if app.opts.mode == RunMode::Development {
			warn!("Running in development mode");
		}

		let router = router(&app);
		let listener =
			tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await.map_err(|e| {
				error!("FATAL: Cannot listen on {}: {}", app.opts.listen, e);
				Error::Io(e)
			})?;
		info!("Listening on HTTP {}", app.opts.listen);

		axum::serve(listener, router).await?;
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Reads the persisted signing secret, generating one on first start
async fn ensure_jwt_secret(meta_adapter: &dyn MetaAdapter) -> ClResult<Box<str>> {
	if let Some(secret) = meta_adapter.read_var(JWT_SECRET_VAR).await? {
		return Ok(secret);
	}
	info!("Generating JWT secret");
	let secret = crypto::generate_jwt_secret();
	meta_adapter.update_var(JWT_SECRET_VAR, &secret).await?;
	Ok(secret.into())
}

/// The complete HTTP router: API routes plus request id, tracing and CORS layers
pub fn router(app: &App) -> Router {
	let mut router = routes::init(app.clone())
		.layer(axum::middleware::from_fn(middleware::request_id))
		.layer(TraceLayer::new_for_http());

	if let Some(cors) = cors_layer(&app.opts.cors_origins) {
		router = router.layer(cors);
	}
	router
}

fn cors_layer(origins: &[Box<str>]) -> Option<CorsLayer> {
	let origins: Vec<HeaderValue> = origins
		.iter()
		.filter_map(|origin| {
			HeaderValue::from_str(origin)
				.inspect_err(|_| warn!("Ignoring invalid CORS origin: {}", origin))
				.ok()
		})
		.collect();
	if origins.is_empty() {
		return None;
	}

	Some(
		CorsLayer::new()
			.allow_origin(AllowOrigin::list(origins))
			.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
			.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
			.allow_credentials(true),
	)
}


// vim: ts=4
