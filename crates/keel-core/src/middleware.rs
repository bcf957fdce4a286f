//! Authentication middleware and permission route guards

use axum::{
	extract::{Request, State},
	http::{HeaderMap, HeaderValue, header},
	middleware::Next,
	response::Response,
};
use std::{future::Future, pin::Pin};

use keel_types::acl::AccessControl;
use keel_types::meta_adapter::Actor;
use keel_types::utils::random_string;

use crate::crypto;
use crate::extract::{Auth, RequestId};
use crate::permission::SUPER_ADMIN;
use crate::prelude::*;

/// Name of the cookie carrying the access token
pub const TOKEN_COOKIE: &str = "BEARER";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
const REQUEST_ID_MAX: usize = 64;

pub type PermissionCheckOutput = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send>>;

/// Access token from `Authorization: Bearer` or, failing that, the token cookie
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
	if let Some(auth_header) = headers.get(header::AUTHORIZATION).and_then(|h| h.to_str().ok()) {
		if let Some(token) = auth_header.strip_prefix("Bearer ") {
			return Some(token.trim());
		}
	}

	headers
		.get_all(header::COOKIE)
		.iter()
		.filter_map(|h| h.to_str().ok())
		.flat_map(|h| h.split(';'))
		.filter_map(|c| c.trim().split_once('='))
		.find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
		.map(|(_, value)| value)
}

/// Resolves the actor of a token. Unknown and disabled actors are unauthorized.
async fn authenticate(app: &App, token: &str) -> ClResult<Actor> {
	let claims = crypto::validate_access_token(&app.jwt, token)?;
	let actor = app.meta_adapter.read_user_by_id(claims.uid).await.map_err(|err| match err {
		Error::NotFound => Error::Unauthorized,
		err => err,
	})?;

	if actor.uuid != claims.sub || !actor.enabled {
		return Err(Error::Unauthorized);
	}
	Ok(actor)
}

pub async fn require_auth(
	State(app): State<App>,
	mut req: Request,
	next: Next,
) -> ClResult<Response> {
	let token = token_from_headers(req.headers()).ok_or(Error::Unauthorized)?;
	let actor = authenticate(&app, token).await?;

	req.extensions_mut().insert(Auth(actor));
	Ok(next.run(req).await)
}

/// Like `require_auth`, but lets anonymous requests (and stale tokens) through
pub async fn optional_auth(
	State(app): State<App>,
	mut req: Request,
	next: Next,
) -> ClResult<Response> {
	if let Some(token) = token_from_headers(req.headers()) {
		match authenticate(&app, token).await {
			Ok(actor) => {
				req.extensions_mut().insert(Auth(actor));
			}
			Err(Error::Unauthorized) => debug!("ignoring invalid access token"),
			Err(err) => return Err(err),
		}
	}

	Ok(next.run(req).await)
}

/// Tags the request with the caller's `X-Request-Id` (or a random one) and
/// echoes it in the response
pub async fn request_id(mut req: Request, next: Next) -> Response {
	let req_id = req
		.headers()
		.get(REQUEST_ID_HEADER)
		.and_then(|h| h.to_str().ok())
		.filter(|id| !id.is_empty() && id.len() <= REQUEST_ID_MAX)
		.map_or_else(|| random_string(16, false), ToString::to_string);

	req.extensions_mut().insert(RequestId(req_id.clone()));
	let mut res = next.run(req).await;
	if let Ok(value) = HeaderValue::from_str(&req_id) {
		res.headers_mut().insert(REQUEST_ID_HEADER, value);
	}
	res
}

/// Middleware factory for permission checks
///
/// Returns a middleware function that lets the request through when the
/// authenticated actor holds `permission` or `super_admin`.
pub fn require_permission(
	permission: &'static str,
) -> impl Fn(State<App>, Auth, Request, Next) -> PermissionCheckOutput + Clone {
	move |state, auth, req, next| Box::pin(check_permission(state, auth, req, next, permission))
}

async fn check_permission(
	State(_app): State<App>,
	Auth(actor): Auth,
	req: Request,
	next: Next,
	permission: &str,
) -> Result<Response, Error> {
	let acl = AccessControl::new(Some(&actor));
	if !acl.has_permission(SUPER_ADMIN) {
		acl.deny_unless_granted(permission)?;
	}

	Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_token_from_bearer_header() {
		let mut headers = HeaderMap::new();
		headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def "));
		headers.insert(header::COOKIE, HeaderValue::from_static("BEARER=cookie"));
		assert_eq!(token_from_headers(&headers), Some("abc.def"));
	}

	#[test]
	fn test_token_from_cookie() {
		let mut headers = HeaderMap::new();
		headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; BEARER=xyz; a=b"));
		assert_eq!(token_from_headers(&headers), Some("xyz"));
	}

	#[test]
	fn test_no_token() {
		let mut headers = HeaderMap::new();
		headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
		headers.insert(header::COOKIE, HeaderValue::from_static("BEARER="));
		assert_eq!(token_from_headers(&headers), None);
	}
}

// vim: ts=4
