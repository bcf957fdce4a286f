//! Seed data and request helpers

use axum::{
	Router,
	body::Body,
	http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use keel::App;
use keel::meta_adapter::{Actor, ActorKind, CreateRole, CreateUser, Role};
use keel_core::crypto;

pub const PASSWORD: &str = "secret123";

pub async fn seed_role(app: &App, name: &str, permissions: &[&str]) -> Role {
	let permissions: Vec<Box<str>> = permissions.iter().map(|p| (*p).into()).collect();
	app.meta_adapter
		.create_role(&CreateRole { name, description: None, enabled: true, permissions: &permissions })
		.await
		.expect("Should create role")
}

/// Creates a user with [`PASSWORD`] as its password
pub async fn seed_user(app: &App, username: &str, role: Option<&Role>) -> Actor {
	let password_hash = crypto::generate_password_hash(&app.worker, PASSWORD.into())
		.await
		.expect("Should hash password");
	app.meta_adapter
		.create_user(&CreateUser {
			username,
			password_hash: &password_hash,
			name: username,
			email: "user@example.com",
			contact_number: None,
			enabled: true,
			kind: ActorKind::User,
			role_id: role.map(|r| r.role_id),
		})
		.await
		.expect("Should create user")
}

/// Creates a user holding a role with `permissions` and returns its access token
pub async fn seed_user_with_permissions(
	app: &App,
	username: &str,
	permissions: &[&str],
) -> (Actor, String) {
	let role = seed_role(app, &format!("{}-role", username), permissions).await;
	let actor = seed_user(app, username, Some(&role)).await;
	let token = token_for(app, &actor);
	(actor, token)
}

pub fn token_for(app: &App, actor: &Actor) -> String {
	crypto::generate_access_token(&app.jwt, &actor.uuid, actor.user_id, 1)
		.expect("Should create token")
		.to_string()
}

pub struct TestResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Value,
}

impl TestResponse {
	pub fn payload(&self) -> &Value {
		&self.body["payload"]
	}

	pub fn response_code(&self) -> &str {
		self.body["response_code"].as_str().unwrap_or_default()
	}
}

pub async fn send_request(router: &Router, req: Request<Body>) -> TestResponse {
	let res = router.clone().oneshot(req).await.expect("Router should respond");
	let status = res.status();
	let headers = res.headers().clone();
	let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.expect("Should read body");
	let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
	TestResponse { status, headers, body }
}

/// Sends a request with an optional bearer token and JSON body
pub async fn send(
	router: &Router,
	method: Method,
	uri: &str,
	token: Option<&str>,
	body: Option<Value>,
) -> TestResponse {
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(token) = token {
		builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
	}
	let body = match body {
		Some(json) => {
			builder = builder.header(header::CONTENT_TYPE, "application/json");
			Body::from(json.to_string())
		}
		None => Body::empty(),
	};
	send_request(router, builder.body(body).expect("Should build request")).await
}

pub async fn get(router: &Router, uri: &str, token: Option<&str>) -> TestResponse {
	send(router, Method::GET, uri, token, None).await
}

pub async fn post(router: &Router, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
	send(router, Method::POST, uri, token, Some(body)).await
}

pub async fn put(router: &Router, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
	send(router, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(router: &Router, uri: &str, token: Option<&str>) -> TestResponse {
	send(router, Method::DELETE, uri, token, None).await
}

// vim: ts=4
