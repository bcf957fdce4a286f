//! Key-value endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;
use keel::meta_adapter::SaveKeyValue;

#[tokio::test]
async fn test_create_and_fetch() {
	let t = create_test_app().await;
	let (editor, token) = seed_user_with_permissions(&t.app, "editor", &["key_value.write"]).await;

	let res = post(
		&t.router,
		"/api/v1/key-value",
		Some(&token),
		json!({ "key": "site_title", "value": "Keel" }),
	)
	.await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert_eq!(res.payload()["key"], "site_title");
	assert_eq!(res.payload()["owner"]["uuid"], &*editor.uuid);

	// Public, single record shape for a literal key
	let res = get(&t.router, "/api/v1/key-value?key=site_title", None).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.response_code(), "fetch_success");
	assert_eq!(res.payload()["value"], "Keel");
	// The public lookup skips owner scoping
	assert!(res.payload()["owner"].is_null());
	assert!(res.payload()["updated_at"].as_str().is_some_and(|ts| ts.contains('T')));

	let res = get(&t.router, "/api/v1/key-value?keys=site_title,%20other", None).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.payload().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_duplicate_key() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "editor", &["key_value.write"]).await;
	let body = json!({ "key": "k", "value": "v" });

	let res = post(&t.router, "/api/v1/key-value", Some(&token), body.clone()).await;
	assert_eq!(res.status, StatusCode::CREATED);
	let res = post(&t.router, "/api/v1/key-value", Some(&token), body).await;
	assert_eq!(res.status, StatusCode::CONFLICT);
	assert_eq!(res.response_code(), "duplicate_resource");

	let res = get(&t.router, "/api/v1/key-value?key=all", None).await;
	assert_eq!(res.payload().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_empty_result_not_found() {
	let t = create_test_app().await;

	let res = get(&t.router, "/api/v1/key-value?key=missing", None).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
	assert_eq!(res.response_code(), "not_found");

	let res = get(&t.router, "/api/v1/key-value", None).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_all_returns_every_record() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "editor", &["key_value.write"]).await;
	for key in ["a", "b", "c"] {
		let body = json!({ "key": key, "value": "v" });
		let res = post(&t.router, "/api/v1/key-value", Some(&token), body).await;
		assert_eq!(res.status, StatusCode::CREATED);
	}

	let res = get(&t.router, "/api/v1/key-value?key=all", None).await;
	assert_eq!(res.payload().as_array().map(Vec::len), Some(3));
	let res = get(&t.router, "/api/v1/key-value?keys=a,all", None).await;
	assert_eq!(res.payload().as_array().map(Vec::len), Some(3));
	// key wins over keys
	let res = get(&t.router, "/api/v1/key-value?key=b&keys=a,c", None).await;
	assert_eq!(res.payload()["key"], "b");
}

#[tokio::test]
async fn test_update_and_delete() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "editor", &["key_value.write"]).await;

	let res =
		post(&t.router, "/api/v1/key-value", Some(&token), json!({ "key": "k", "value": "v1" })).await;
	let uuid = res.payload()["uuid"].as_str().expect("uuid").to_string();

	let uri = format!("/api/v1/key-value/{}", uuid);
	let res = put(&t.router, &uri, Some(&token), json!({ "key": "k", "value": "v2" })).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.response_code(), "resource_updated");
	assert_eq!(res.payload()["value"], "v2");
	assert_eq!(res.payload()["uuid"], uuid.as_str());

	let res = put(
		&t.router,
		"/api/v1/key-value/no-such-uuid",
		Some(&token),
		json!({ "key": "k", "value": "v3" }),
	)
	.await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);

	let res = delete(&t.router, &uri, Some(&token)).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.response_code(), "resource_deleted");
	let res = delete(&t.router, &uri, Some(&token)).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rename_conflict() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "editor", &["key_value.write"]).await;

	let body = json!({ "key": "a", "value": "1" });
	let res = post(&t.router, "/api/v1/key-value", Some(&token), body).await;
	assert_eq!(res.status, StatusCode::CREATED);
	let body = json!({ "key": "b", "value": "2" });
	let res = post(&t.router, "/api/v1/key-value", Some(&token), body).await;
	let uuid = res.payload()["uuid"].as_str().expect("uuid").to_string();

	let uri = format!("/api/v1/key-value/{}", uuid);
	let res = put(&t.router, &uri, Some(&token), json!({ "key": "a", "value": "2" })).await;
	assert_eq!(res.status, StatusCode::CONFLICT);
	assert_eq!(res.response_code(), "duplicate_resource");

	let res = get(&t.router, "/api/v1/key-value?key=b", None).await;
	assert_eq!(res.payload()["value"], "2");
}

#[tokio::test]
async fn test_owner_filter() {
	let t = create_test_app().await;
	let (alice, alice_token) =
		seed_user_with_permissions(&t.app, "alice", &["key_value.write"]).await;
	let (bob, bob_token) = seed_user_with_permissions(&t.app, "bob", &["key_value.write"]).await;
	for token in [&alice_token, &bob_token] {
		let body = json!({ "key": "theme", "value": "dark" });
		let res = post(&t.router, "/api/v1/key-value", Some(token), body).await;
		assert_eq!(res.status, StatusCode::CREATED);
	}

	let uri = format!("/api/v1/key-value?keys=theme&owner_uuid={}", bob.uuid);
	let res = get(&t.router, &uri, None).await;
	let rows = res.payload().as_array().cloned().unwrap_or_default();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0]["owner"]["uuid"], &*bob.uuid);
	assert_eq!(rows[0]["owner"]["name"], "bob");

	let uri = format!("/api/v1/key-value?key=all&owner_uuid={},{}", alice.uuid, bob.uuid);
	let res = get(&t.router, &uri, None).await;
	assert_eq!(res.payload().as_array().map(Vec::len), Some(2));

	let res = get(&t.router, "/api/v1/key-value?key=theme&owner_uuid=nobody", None).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_literal_key_prefers_ownerless_record() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "editor", &["key_value.write"]).await;
	let body = json!({ "key": "banner", "value": "draft" });
	let res = post(&t.router, "/api/v1/key-value", Some(&token), body).await;
	assert_eq!(res.status, StatusCode::CREATED);

	let global = SaveKeyValue {
		key: "banner",
		value: "published",
		owner_id: None,
		is_update: false,
		uuid: None,
	};
	t.app.meta_adapter.save_key_value(&global).await.expect("Should save key-value");

	let res = get(&t.router, "/api/v1/key-value?key=banner", None).await;
	assert_eq!(res.payload()["value"], "published");
}

#[tokio::test]
async fn test_value_length_bounds() {
	let t = create_test_app().await;
	let (_, token) = seed_user_with_permissions(&t.app, "editor", &["key_value.write"]).await;

	let value = "x".repeat(50_000);
	let res =
		post(&t.router, "/api/v1/key-value", Some(&token), json!({ "key": "big", "value": value }))
			.await;
	assert_eq!(res.status, StatusCode::CREATED);
	let res = get(&t.router, "/api/v1/key-value?key=big", None).await;
	assert_eq!(res.payload()["value"].as_str(), Some(value.as_str()));

	let res = post(
		&t.router,
		"/api/v1/key-value",
		Some(&token),
		json!({ "key": "bigger", "value": "x".repeat(50_001) }),
	)
	.await;
	assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

	let res = post(
		&t.router,
		"/api/v1/key-value",
		Some(&token),
		json!({ "key": "k".repeat(41), "value": "v" }),
	)
	.await;
	assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_write_permission_required() {
	let t = create_test_app().await;
	let body = json!({ "key": "k", "value": "v" });

	let res = post(&t.router, "/api/v1/key-value", None, body.clone()).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	let (_, token) = seed_user_with_permissions(&t.app, "reader", &["user.read"]).await;
	let res = post(&t.router, "/api/v1/key-value", Some(&token), body.clone()).await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);
	assert_eq!(res.response_code(), "permission_denied");

	let (_, token) = seed_user_with_permissions(&t.app, "root", &["super_admin"]).await;
	let res = post(&t.router, "/api/v1/key-value", Some(&token), body).await;
	assert_eq!(res.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_disabled_role_denied() {
	let t = create_test_app().await;
	let (actor, token) = seed_user_with_permissions(&t.app, "editor", &["key_value.write"]).await;
	let role = actor.role.expect("role");

	let update = keel::meta_adapter::UpdateRole { enabled: Some(false), ..Default::default() };
	t.app.meta_adapter.update_role(&role.uuid, &update).await.expect("Should disable role");

	let res =
		post(&t.router, "/api/v1/key-value", Some(&token), json!({ "key": "k", "value": "v" })).await;
	assert_eq!(res.status, StatusCode::FORBIDDEN);
}

// vim: ts=4
