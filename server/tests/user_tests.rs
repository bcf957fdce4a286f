//! User management endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;
use keel::App;
use keel::meta_adapter::{Actor, ActorKind, CreateUser, SaveKeyValue};

/// Inserts a user without hashing a password, for bulk seeding
async fn insert_user(app: &App, username: &str, name: &str) -> Actor {
	app.meta_adapter
		.create_user(&CreateUser {
			username,
			password_hash: "-",
			name,
			email: "bulk@example.com",
			contact_number: None,
			enabled: true,
			kind: ActorKind::Customer,
			role_id: None,
		})
		.await
		.expect("Should create user")
}

#[tokio::test]
async fn test_list_pagination() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "admin", &["user.read"]).await;
	for i in 0..34 {
		insert_user(&t.app, &format!("user{:02}", i), &format!("User {:02}", i)).await;
	}

	let res = get(&t.router, "/api/v1/user", Some(&token)).await;
	assert_eq!(res.status, StatusCode::OK);
	let pagination = &res.payload()["pagination"];
	assert_eq!(pagination["total_item_count"], 35);
	assert_eq!(pagination["total_page_count"], 2);
	assert_eq!(pagination["current_page_items_count"], 30);
	assert_eq!(pagination["has_next_page"], true);
	assert_eq!(res.payload()["items"].as_array().map(Vec::len), Some(30));

	let res = get(&t.router, "/api/v1/user?page=2", Some(&token)).await;
	let pagination = &res.payload()["pagination"];
	assert_eq!(pagination["current_page"], 2);
	assert_eq!(pagination["current_page_items_count"], 5);
	assert_eq!(pagination["has_next_page"], false);

	let res = get(&t.router, "/api/v1/user?limit=10&page=4", Some(&token)).await;
	assert_eq!(res.payload()["items"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn test_list_filters() {
	let t = create_test_app().await;
	let (admin, token) = seed_user_with_permissions(&t.app, "admin", &["user.read"]).await;
	let ann = insert_user(&t.app, "ann", "Ann Smith").await;
	insert_user(&t.app, "bob", "Bob Jones").await;

	let uri = format!("/api/v1/user?q=%23{}", ann.user_id);
	let res = get(&t.router, &uri, Some(&token)).await;
	let items = res.payload()["items"].as_array().cloned().unwrap_or_default();
	assert_eq!(items.len(), 1);
	assert_eq!(items[0]["uuid"], &*ann.uuid);

	let res = get(&t.router, "/api/v1/user?q=%23abc", Some(&token)).await;
	assert_eq!(res.payload()["pagination"]["total_item_count"], 0);

	let res = get(&t.router, "/api/v1/user?q=Jones", Some(&token)).await;
	assert_eq!(res.payload()["items"][0]["username"], "bob");
	// Name search is case-sensitive
	let res = get(&t.router, "/api/v1/user?q=jones", Some(&token)).await;
	assert_eq!(res.payload()["pagination"]["total_item_count"], 0);

	let res = get(&t.router, "/api/v1/user?role=admin-role", Some(&token)).await;
	let items = res.payload()["items"].as_array().cloned().unwrap_or_default();
	assert_eq!(items.len(), 1);
	assert_eq!(items[0]["uuid"], &*admin.uuid);
	assert_eq!(items[0]["role"], "admin-role");
	assert!(items[0].get("password").is_none());
}

#[tokio::test]
async fn test_read_by_uuid() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "admin", &["user.read"]).await;
	let ann = insert_user(&t.app, "ann", "Ann Smith").await;

	let uri = format!("/api/v1/user?uuid={}", ann.uuid);
	let res = get(&t.router, &uri, Some(&token)).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.payload()["name"], "Ann Smith");
	assert!(res.payload().get("pagination").is_none());

	let res = get(&t.router, "/api/v1/user?uuid=missing", Some(&token)).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_key_value_merge() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "admin", &["user.read"]).await;
	let ann = insert_user(&t.app, "ann", "Ann Smith").await;
	let bob = insert_user(&t.app, "bob", "Bob Jones").await;

	for (owner, key, value) in
		[(&ann, "city", "Budapest"), (&ann, "name", "Mallory"), (&bob, "city", "Vienna")]
	{
		t.app
			.meta_adapter
			.save_key_value(&SaveKeyValue {
				key,
				value,
				owner_id: Some(owner.user_id),
				is_update: false,
				uuid: None,
			})
			.await
			.expect("Should save key-value");
	}

	let res = get(&t.router, "/api/v1/user?key_value=city,name&limit=50", Some(&token)).await;
	let items = res.payload()["items"].as_array().cloned().unwrap_or_default();
	let find = |uuid: &str| items.iter().find(|item| item["uuid"] == uuid).cloned();
	let ann_view = find(&*ann.uuid).expect("ann listed");
	assert_eq!(ann_view["city"], "Budapest");
	assert_eq!(ann_view["name"], "Ann Smith");
	assert_eq!(find(&*bob.uuid).expect("bob listed")["city"], "Vienna");

	let uri = format!("/api/v1/user?uuid={}&key_value=all", bob.uuid);
	let res = get(&t.router, &uri, Some(&token)).await;
	assert_eq!(res.payload()["city"], "Vienna");

	// Without key_value nothing is merged
	let uri = format!("/api/v1/user?uuid={}", bob.uuid);
	let res = get(&t.router, &uri, Some(&token)).await;
	assert!(res.payload().get("city").is_none());
}

#[tokio::test]
async fn test_create_update_delete() {
	let t = create_test_app().await;
	let (_, token) =
		seed_user_with_permissions(&t.app, "admin", &["user.read", "user.write"]).await;
	seed_role(&t.app, "editor", &["key_value.write"]).await;

	let res = post(
		&t.router,
		"/api/v1/user",
		Some(&token),
		json!({
			"password": "hunter22",
			"name": "Ann Smith",
			"email_address": "ann@example.com",
			"contact_number": "+36 (1) 234-5678",
			"role": "editor",
		}),
	)
	.await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert_eq!(res.payload()["username"], "ann@example.com");
	assert_eq!(res.payload()["contact_number"], "+3612345678");
	assert_eq!(res.payload()["role"], "editor");
	assert_eq!(res.payload()["enabled"], true);
	let uuid = res.payload()["uuid"].as_str().expect("uuid").to_string();

	// The new user can log in
	let res = post(
		&t.router,
		"/api/v1/account/login",
		None,
		json!({ "username": "ann@example.com", "password": "hunter22" }),
	)
	.await;
	assert_eq!(res.status, StatusCode::OK);

	let uri = format!("/api/v1/user/{}", uuid);
	let res = put(
		&t.router,
		&uri,
		Some(&token),
		json!({ "name": "Ann Jones", "role": null, "contact_number": null, "password": "" }),
	)
	.await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.payload()["name"], "Ann Jones");
	assert!(res.payload()["role"].is_null());
	assert!(res.payload()["contact_number"].is_null());

	// Empty password kept the old one
	let res = post(
		&t.router,
		"/api/v1/account/login",
		None,
		json!({ "username": "ann@example.com", "password": "hunter22" }),
	)
	.await;
	assert_eq!(res.status, StatusCode::OK);

	let res = delete(&t.router, &uri, Some(&token)).await;
	assert_eq!(res.status, StatusCode::OK);
	let res = get(&t.router, &format!("/api/v1/user?uuid={}", uuid), Some(&token)).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
	let res = delete(&t.router, &uri, Some(&token)).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_validation() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "admin", &["user.write"]).await;
	let valid = json!({
		"username": "ann",
		"password": "hunter22",
		"name": "Ann Smith",
		"email_address": "ann@example.com",
	});

	let mut body = valid.clone();
	body["password"] = json!("short");
	let res = post(&t.router, "/api/v1/user", Some(&token), body).await;
	assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

	let mut body = valid.clone();
	body["email_address"] = json!("not-an-email");
	let res = post(&t.router, "/api/v1/user", Some(&token), body).await;
	assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

	let mut body = valid.clone();
	body["role"] = json!("no-such-role");
	let res = post(&t.router, "/api/v1/user", Some(&token), body).await;
	assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
	assert!(res.payload()["message"].as_str().is_some_and(|m| m.contains("no-such-role")));

	let res = post(&t.router, "/api/v1/user", Some(&token), valid.clone()).await;
	assert_eq!(res.status, StatusCode::CREATED);
	let res = post(&t.router, "/api/v1/user", Some(&token), valid).await;
	assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_removes_key_values() {
	let t = create_test_app().await;
	let (_, token) =
		seed_user_with_permissions(&t.app, "admin", &["user.write", "key_value.write"]).await;
	let (editor, editor_token) =
		seed_user_with_permissions(&t.app, "editor", &["key_value.write"]).await;

	let res = post(
		&t.router,
		"/api/v1/key-value",
		Some(&editor_token),
		json!({ "key": "draft", "value": "text" }),
	)
	.await;
	assert_eq!(res.status, StatusCode::CREATED);

	let res = delete(&t.router, &format!("/api/v1/user/{}", editor.uuid), Some(&token)).await;
	assert_eq!(res.status, StatusCode::OK);

	let res = get(&t.router, "/api/v1/key-value?key=draft", None).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cannot_delete_self() {
	let t = create_test_app().await;
	let (admin, token) = seed_user_with_permissions(&t.app, "admin", &["user.write"]).await;

	let res = delete(&t.router, &format!("/api/v1/user/{}", admin.uuid), Some(&token)).await;
	assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_permissions() {
	let t = create_test_app().await;
	let (_, reader) = seed_user_with_permissions(&t.app, "reader", &["user.read"]).await;
	let (_, writer) = seed_user_with_permissions(&t.app, "writer", &["user.write"]).await;
	let body = json!({
		"username": "ann",
		"password": "hunter22",
		"name": "Ann Smith",
		"email_address": "ann@example.com",
	});

	let res = get(&t.router, "/api/v1/user", None).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	let res = post(&t.router, "/api/v1/user", Some(&reader), body).await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);

	let res = get(&t.router, "/api/v1/user", Some(&writer)).await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);
}

// vim: ts=4
