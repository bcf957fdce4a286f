//! Request extractors fed by the middleware in [`crate::middleware`]

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use keel_types::acl::AccessControl;
use keel_types::meta_adapter::Actor;

use crate::prelude::*;

// Auth //
//******//
/// The actor resolved by `require_auth` or `optional_auth`. Extracting it
/// from a request that carries none is unauthorized.
#[derive(Debug, Clone)]
pub struct Auth(pub Actor);

impl Auth {
	pub fn acl(&self) -> AccessControl<'_> {
		AccessControl::new(Some(&self.0))
	}
}

impl<S: Send + Sync> FromRequestParts<S> for Auth {
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> ClResult<Self> {
		parts.extensions.get::<Auth>().cloned().ok_or(Error::Unauthorized)
	}
}

// OptionalAuth //
//**************//
/// The actor if the request carried a valid token, anonymous otherwise
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Actor>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalAuth {
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> ClResult<Self> {
		Ok(OptionalAuth(parts.extensions.get::<Auth>().map(|auth| auth.0.clone())))
	}
}

// RequestId //
//***********//
/// Correlation id of the request, echoed in `X-Request-Id` and the response envelope
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Never fails, `None` outside the `request_id` middleware
#[derive(Clone, Debug)]
pub struct OptionalRequestId(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalRequestId {
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> ClResult<Self> {
		Ok(OptionalRequestId(parts.extensions.get::<RequestId>().map(|id| id.0.clone())))
	}
}

// vim: ts=4
