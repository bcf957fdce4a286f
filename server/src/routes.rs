use axum::{
	Router,
	extract::DefaultBodyLimit,
	middleware,
	routing::{get, post, put},
};

use crate::App;
use crate::{account, contact, file, key_value, role, user};
use keel_core::middleware::{optional_auth, require_auth, require_permission};
use keel_core::permission::{
	CONTACT_MESSAGE_READ, KEY_VALUE_WRITE, ROLE_READ, ROLE_WRITE, USER_READ, USER_WRITE,
};

fn init_public(app: &App) -> Router<App> {
	Router::new()
		.route("/api/v1/account/register", post(account::handler::post_register))
		.route("/api/v1/account/login", post(account::handler::post_login))
		.route("/api/v1/account/logout", post(account::handler::post_logout))
		.route("/api/v1/key-value", get(key_value::handler::get_key_values))
		.route("/api/v1/contact-message", post(contact::handler::post_contact_message))
		.route_layer(middleware::from_fn_with_state(app.clone(), optional_auth))
}

fn init_protected(app: &App) -> Router<App> {
	let authenticated = Router::new()
		.route("/api/v1/account/me", get(account::handler::get_me))
		.route(
			"/api/v1/file/upload",
			post(file::handler::post_upload).layer(DefaultBodyLimit::max(file::UPLOAD_MAX_SIZE)),
		);

	let key_value_write = Router::new()
		.route("/api/v1/key-value", post(key_value::handler::post_key_value))
		.route(
			"/api/v1/key-value/{uuid}",
			put(key_value::handler::put_key_value).delete(key_value::handler::delete_key_value),
		)
		.route_layer(middleware::from_fn_with_state(
			app.clone(),
			require_permission(KEY_VALUE_WRITE),
		));

	let user_read = Router::new()
		.route("/api/v1/user", get(user::handler::list_users))
		.route_layer(middleware::from_fn_with_state(app.clone(), require_permission(USER_READ)));

	let user_write = Router::new()
		.route("/api/v1/user", post(user::handler::post_user))
		.route(
			"/api/v1/user/{uuid}",
			put(user::handler::put_user).delete(user::handler::delete_user),
		)
		.route_layer(middleware::from_fn_with_state(app.clone(), require_permission(USER_WRITE)));

	let role_read = Router::new()
		.route("/api/v1/role", get(role::handler::list_roles))
		.route_layer(middleware::from_fn_with_state(app.clone(), require_permission(ROLE_READ)));

	let role_write = Router::new()
		.route("/api/v1/role", post(role::handler::post_role))
		.route(
			"/api/v1/role/{uuid}",
			put(role::handler::put_role).delete(role::handler::delete_role),
		)
		.route_layer(middleware::from_fn_with_state(app.clone(), require_permission(ROLE_WRITE)));

	let contact_read = Router::new()
		.route("/api/v1/contact-message", get(contact::handler::list_contact_messages))
		.route_layer(middleware::from_fn_with_state(
			app.clone(),
			require_permission(CONTACT_MESSAGE_READ),
		));

	Router::new()
		.merge(authenticated)
		.merge(key_value_write)
		.merge(user_read)
		.merge(user_write)
		.merge(role_read)
		.merge(role_write)
		.merge(contact_read)
		.route_layer(middleware::from_fn_with_state(app.clone(), require_auth))
}

pub fn init(app: App) -> Router {
	Router::new()
		.merge(init_public(&app))
		.merge(init_protected(&app))
		.with_state(app)
}

// vim: ts=4
