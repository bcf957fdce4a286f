//! `user` subcommands: bootstrap administrators and reset passwords

use clap::Subcommand;

use keel::core::crypto;
use keel::core::permission::SUPER_ADMIN;
use keel::error::{ClResult, Error};
use keel::meta_adapter::{ActorKind, CreateRole, CreateUser, MetaAdapter, Role, UpdateUser};
use keel::user::{
	normalize_contact_number, validate_email_address, validate_password, validate_username,
};
use keel::utils::validate_length;
use keel::worker::WorkerPool;

const ADMIN_ROLE: &str = "admin";
const ADMIN_ROLE_DESCRIPTION: &str = "Administrator role with full system access";
/// Display names entered on the command line are kept short
const NAME_LEN: (usize, usize) = (2, 20);

#[derive(Debug, Subcommand)]
pub enum UserCommand {
	/// Create an administrator user
	Create {
		#[arg(long)]
		username: String,
		#[arg(long)]
		password: String,
		#[arg(long)]
		name: String,
		#[arg(long)]
		email: String,
		#[arg(long)]
		contact_number: Option<String>,
	},
	/// Set a new password for an existing user
	ResetPassword {
		#[arg(long)]
		username: String,
		#[arg(long)]
		password: String,
	},
}

/// The `admin` role, created with `super_admin` on first use
async fn ensure_admin_role(meta_adapter: &dyn MetaAdapter) -> ClResult<Role> {
	match meta_adapter.read_role_by_name(ADMIN_ROLE).await {
		Err(Error::NotFound) => {
			tracing::info!("Creating role {}", ADMIN_ROLE);
			meta_adapter
				.create_role(&CreateRole {
					name: ADMIN_ROLE,
					description: Some(ADMIN_ROLE_DESCRIPTION),
					enabled: true,
					permissions: &[SUPER_ADMIN.into()],
				})
				.await
		}
		res => res,
	}
}

struct CreateUserArgs<'a> {
	username: &'a str,
	password: &'a str,
	name: &'a str,
	email: &'a str,
	contact_number: Option<&'a str>,
}

async fn create_user(
	meta_adapter: &dyn MetaAdapter,
	worker: &WorkerPool,
	user: &CreateUserArgs<'_>,
) -> ClResult<()> {
	validate_username(user.username)?;
	validate_password(user.password)?;
	validate_length("name", user.name.trim(), NAME_LEN.0, NAME_LEN.1)?;
	validate_email_address(user.email)?;
	let contact_number = normalize_contact_number(user.contact_number)?;

	match meta_adapter.read_user_auth(user.username).await {
		Err(Error::NotFound) => {}
		Ok(_) => {
			return Err(Error::ValidationError(format!(
				"username {} is already taken",
				user.username
			)));
		}
		Err(err) => return Err(err),
	}

	let role = ensure_admin_role(meta_adapter).await?;
	let password_hash = crypto::generate_password_hash(worker, user.password.into()).await?;
	let actor = meta_adapter
		.create_user(&CreateUser {
			username: user.username,
			password_hash: &password_hash,
			name: user.name.trim(),
			email: user.email,
			contact_number: contact_number.as_deref(),
			enabled: true,
			kind: ActorKind::Admin,
			role_id: Some(role.role_id),
		})
		.await?;

	println!("Created user {} ({})", actor.username, actor.uuid);
	Ok(())
}

async fn reset_password(
	meta_adapter: &dyn MetaAdapter,
	worker: &WorkerPool,
	username: &str,
	password: &str,
) -> ClResult<()> {
	validate_password(password)?;
	let (actor, _) = meta_adapter.read_user_auth(username).await?;

	let password_hash = crypto::generate_password_hash(worker, password.into()).await?;
	let update = UpdateUser { password_hash: Some(password_hash), ..Default::default() };
	meta_adapter.update_user(&actor.uuid, &update).await?;

	println!("Password of {} updated", actor.username);
	Ok(())
}

pub async fn run(
	cmd: UserCommand,
	meta_adapter: &dyn MetaAdapter,
	worker: &WorkerPool,
) -> ClResult<()> {
	let res = match &cmd {
		UserCommand::Create { username, password, name, email, contact_number } => {
			let args = CreateUserArgs {
				username: username.trim(),
				password,
				name,
				email: email.trim(),
				contact_number: contact_number.as_deref(),
			};
			create_user(meta_adapter, worker, &args).await
		}
		UserCommand::ResetPassword { username, password } => {
			reset_password(meta_adapter, worker, username.trim(), password).await
		}
	};
	if let Err(Error::ValidationError(msg)) = &res {
		eprintln!("error: {}", msg);
	}
	res
}

// vim: ts=4
