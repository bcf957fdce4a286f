//! Account endpoints: registration, login, logout and the current actor.

pub mod handler;

use keel_core::middleware::TOKEN_COOKIE;

/// `Set-Cookie` value carrying an access token
pub fn token_cookie(token: &str, max_age_secs: u64, secure: bool) -> String {
	let mut cookie = format!(
		"{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
		TOKEN_COOKIE, token, max_age_secs
	);
	if secure {
		cookie.push_str("; Secure");
	}
	cookie
}

/// `Set-Cookie` value removing the access token
pub fn clear_token_cookie(secure: bool) -> String {
	token_cookie("", 0, secure)
}


// vim: ts=4
