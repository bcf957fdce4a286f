use axum::{
	Json,
	extract::State,
	http::{StatusCode, header},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{clear_token_cookie, token_cookie};
use crate::acl::AccessControl;
use crate::meta_adapter::{ActorKind, CreateUser};
use crate::prelude::*;
use crate::user::{
	UserView, normalize_contact_number, validate_email_address, validate_name, validate_password,
};
use keel_core::{RunMode, crypto};

/// Role assigned to self-registered accounts, when it exists
const CUSTOMER_ROLE: &str = "customer";
const LOGIN_FAILURE_DELAY: Duration = Duration::from_secs(1);

type CookieHeader = [(header::HeaderName, String); 1];

fn secure_cookie(app: &App) -> bool {
	app.opts.mode == RunMode::Production
}

/// # POST /api/v1/account/register
#[derive(Debug, Deserialize)]
pub struct RegisterReq {
	name: String,
	email_address: String,
	password: String,
	contact_number: Option<String>,
}

pub async fn post_register(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	Json(req): Json<RegisterReq>,
) -> ClResult<(StatusCode, Json<ApiResponse<UserView>>)> {
	let email = req.email_address.trim();
	validate_name(&req.name)?;
	validate_email_address(email)?;
	validate_password(&req.password)?;
	let contact_number = normalize_contact_number(req.contact_number.as_deref())?;

	let role_id = match app.meta_adapter.read_role_by_name(CUSTOMER_ROLE).await {
		Ok(role) => Some(role.role_id),
		Err(Error::NotFound) => None,
		Err(err) => return Err(err),
	};

	let password_hash = crypto::generate_password_hash(&app.worker, req.password.into()).await?;
	let actor = app
		.meta_adapter
		.create_user(&CreateUser {
			username: email,
			password_hash: &password_hash,
			name: req.name.trim(),
			email,
			contact_number: contact_number.as_deref(),
			enabled: true,
			kind: ActorKind::Customer,
			role_id,
		})
		.await?;
	info!("registered account {}", actor.username);

	let response = ApiResponse::new(ResponseCode::ResourceCreated, UserView::from(&actor))
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::CREATED, Json(response)))
}

/// # POST /api/v1/account/login
#[derive(Debug, Deserialize)]
pub struct LoginReq {
	username: String,
	password: String,
}

#[derive(Debug, Serialize)]
pub struct Login {
	pub token: Box<str>,
	pub user: UserView,
	pub permissions: Vec<Box<str>>,
}

pub async fn post_login(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
	Json(req): Json<LoginReq>,
) -> ClResult<(StatusCode, CookieHeader, Json<ApiResponse<Login>>)> {
	let verified = match app.meta_adapter.read_user_auth(req.username.trim()).await {
		Ok((actor, password_hash)) if actor.enabled => {
			crypto::check_password(&app.worker, req.password.into(), password_hash)
				.await
				.map(|()| actor)
		}
		Ok(_) | Err(Error::NotFound) => Err(Error::Unauthorized),
		Err(err) => return Err(err),
	};
	let actor = match verified {
		Ok(actor) => actor,
		Err(Error::Unauthorized) => {
			warn!(username = %req.username, "login failed");
			tokio::time::sleep(LOGIN_FAILURE_DELAY).await;
			return Err(Error::Unauthorized);
		}
		Err(err) => return Err(err),
	};

	let token = crypto::generate_access_token(
		&app.jwt,
		&actor.uuid,
		actor.user_id,
		app.opts.token_expiry,
	)?;
	let max_age = u64::from(app.opts.token_expiry) * 3600;
	let cookie = token_cookie(&token, max_age, secure_cookie(&app));
	info!("{} logged in", actor.username);

	let login = Login {
		token,
		user: UserView::from(&actor),
		permissions: AccessControl::new(Some(&actor)).actor_permissions(),
	};
	let response = ApiResponse::new(ResponseCode::AuthSuccessful, login)
		.with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// # POST /api/v1/account/logout
///
/// Tokens are stateless; logging out only clears the cookie.
pub async fn post_logout(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, CookieHeader, Json<ApiResponse<()>>)> {
	if let Some(actor) = &auth {
		info!("{} logged out", actor.username);
	}

	let response =
		ApiResponse::new(ResponseCode::LoggedOut, ()).with_req_id(req_id.unwrap_or_default());
	let cookie = clear_token_cookie(secure_cookie(&app));
	Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// # GET /api/v1/account/me
#[derive(Debug, Serialize)]
pub struct Me {
	#[serde(flatten)]
	pub user: UserView,
	pub permissions: Vec<Box<str>>,
	pub is_admin: bool,
}

pub async fn get_me(
	auth: Auth,
	OptionalRequestId(req_id): OptionalRequestId,
) -> ClResult<(StatusCode, Json<ApiResponse<Me>>)> {
	let acl = auth.acl();
	let me = Me {
		user: UserView::from(&auth.0),
		permissions: acl.actor_permissions(),
		is_admin: acl.is_admin(),
	};

	let response =
		ApiResponse::new(ResponseCode::FetchSuccess, me).with_req_id(req_id.unwrap_or_default());
	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
