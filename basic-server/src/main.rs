//! Keel server binary
//!
//! Wires the SQLite metadata adapter and the filesystem blob adapter into the
//! Keel app. Every option can also be given through a `KEEL_*` environment
//! variable.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod user;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, sync::Arc};

use keel::error::ClResult;
use keel::worker::WorkerPool;
use keel::{AppBuilder, RunMode};
use keel_blob_adapter_fs::BlobAdapterFs;
use keel_meta_adapter_sqlite::MetaAdapterSqlite;

#[derive(Debug, Parser)]
#[command(author, version, about = "Keel API server", long_about = None)]
struct Cli {
	/// Directory of the database and the uploaded files
	#[arg(long, env = "KEEL_DATA_DIR", default_value = "./data", global = true)]
	data_dir: PathBuf,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Run the HTTP server
	Serve(ServeArgs),
	/// Manage users
	#[command(subcommand)]
	User(user::UserCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
	Production,
	#[value(alias = "dev")]
	Development,
}

impl From<Mode> for RunMode {
	fn from(mode: Mode) -> Self {
		match mode {
			Mode::Production => RunMode::Production,
			Mode::Development => RunMode::Development,
		}
	}
}

#[derive(Debug, Args)]
struct ServeArgs {
	#[arg(long, env = "KEEL_LISTEN", default_value = "127.0.0.1:8080")]
	listen: String,
	/// Token signing secret, generated and stored in the database when unset
	#[arg(long, env = "KEEL_JWT_SECRET", hide_env_values = true)]
	jwt_secret: Option<String>,
	/// Access token lifetime in hours
	#[arg(long, env = "KEEL_TOKEN_EXPIRY", default_value_t = 8)]
	token_expiry: u32,
	/// Comma separated list of allowed origins
	#[arg(long, env = "KEEL_CORS_ORIGINS", value_delimiter = ',')]
	cors_origins: Vec<String>,
	#[arg(long, env = "KEEL_UPLOAD_BASE_URL", default_value = "/files")]
	upload_base_url: String,
	/// Storage key prefix of uploads, `dev` by default in development mode
	#[arg(long, env = "KEEL_UPLOAD_PREFIX")]
	upload_prefix: Option<String>,
	#[arg(long = "env", env = "KEEL_ENV", value_enum, default_value = "production")]
	mode: Mode,
}

fn worker_pool() -> Arc<WorkerPool> {
	let threads = std::thread::available_parallelism().map_or(2, usize::from);
	Arc::new(WorkerPool::new(1, threads.max(2) - 1))
}

async fn open_meta_adapter(data_dir: &std::path::Path) -> ClResult<MetaAdapterSqlite> {
	MetaAdapterSqlite::new(data_dir.join("meta.db")).await.inspect_err(|err| {
		tracing::error!("FATAL: Cannot open database in {}: {}", data_dir.display(), err);
	})
}

async fn serve(data_dir: PathBuf, args: ServeArgs) -> ClResult<()> {
	tokio::fs::create_dir_all(&data_dir).await?;
	let meta_adapter = open_meta_adapter(&data_dir).await?;
	let blob_adapter = BlobAdapterFs::new(data_dir.join("files").into()).await?;

	let mut builder = AppBuilder::new();
	builder
		.mode(args.mode.into())
		.listen(args.listen)
		.token_expiry(args.token_expiry)
		.cors_origins(args.cors_origins.into_iter().map(|o| o.trim().to_string()))
		.upload_base_url(args.upload_base_url)
		.worker(worker_pool())
		.meta_adapter(Arc::new(meta_adapter))
		.blob_adapter(Arc::new(blob_adapter));
	if let Some(secret) = args.jwt_secret.filter(|s| !s.is_empty()) {
		builder.jwt_secret(secret);
	}
	if let Some(prefix) = args.upload_prefix {
		builder.upload_prefix(prefix);
	}

	builder.run().await
}

#[tokio::main]
async fn main() -> ClResult<()> {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.with_target(false)
		.try_init();

	let cli = Cli::parse();
	match cli.command {
		Command::Serve(args) => serve(cli.data_dir, args).await,
		Command::User(cmd) => {
			tokio::fs::create_dir_all(&cli.data_dir).await?;
			let meta_adapter = open_meta_adapter(&cli.data_dir).await?;
			user::run(cmd, &meta_adapter, &worker_pool()).await
		}
	}
}

// vim: ts=4
