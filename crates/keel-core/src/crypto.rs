//! Password hashing and access tokens

use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use keel_types::worker::WorkerPool;

use crate::prelude::*;

const BCRYPT_COST: u32 = 10;

/// HS256 signing and verification keys
pub struct JwtKeys {
	encoding: EncodingKey,
	decoding: DecodingKey,
}

impl JwtKeys {
	pub fn from_secret(secret: &str) -> Self {
		Self {
			encoding: EncodingKey::from_secret(secret.as_bytes()),
			decoding: DecodingKey::from_secret(secret.as_bytes()),
		}
	}
}

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
	/// user uuid
	pub sub: Box<str>,
	/// user id
	pub uid: i64,
	pub iat: i64,
	pub exp: i64,
}

/// 32 random bytes, base64 encoded
pub fn generate_jwt_secret() -> String {
	use rand::Rng;
	let mut secret_bytes = [0u8; 32];
	let mut rng = rand::rng();
	rng.fill_bytes(&mut secret_bytes);
	base64::engine::general_purpose::STANDARD.encode(secret_bytes)
}

fn generate_password_hash_sync(password: &str) -> ClResult<Box<str>> {
	let hash = bcrypt::hash(password, BCRYPT_COST)
		.map_err(|err| Error::Internal(format!("bcrypt: {}", err)))?;
	Ok(hash.into())
}

/// Runs on the normal queue; login verification keeps the high priority one
pub async fn generate_password_hash(worker: &WorkerPool, password: Box<str>) -> ClResult<Box<str>> {
	worker.try_run(move || generate_password_hash_sync(&password)).await
}

fn check_password_sync(password: &str, password_hash: &str) -> ClResult<()> {
	match bcrypt::verify(password, password_hash) {
		Ok(true) => Ok(()),
		_ => Err(Error::Unauthorized),
	}
}

/// Fails with `Unauthorized` when the password does not match
pub async fn check_password(
	worker: &WorkerPool,
	password: Box<str>,
	password_hash: Box<str>,
) -> ClResult<()> {
	worker.try_run_immed(move || check_password_sync(&password, &password_hash)).await
}

pub fn generate_access_token(
	keys: &JwtKeys,
	user_uuid: &str,
	user_id: i64,
	expiry_hours: u32,
) -> ClResult<Box<str>> {
	let now = Timestamp::now();
	let claims = AccessClaims {
		sub: user_uuid.into(),
		uid: user_id,
		iat: now.0,
		exp: now.0 + 3600 * i64::from(expiry_hours),
	};
	let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
		.inspect_err(|err| error!("token encode: {}", err))
		.map_err(|_| Error::Internal("token encoding failed".into()))?;
	Ok(token.into())
}

/// Verifies signature and expiry
pub fn validate_access_token(keys: &JwtKeys, token: &str) -> ClResult<AccessClaims> {
	let token_data = decode::<AccessClaims>(token, &keys.decoding, &Validation::new(Algorithm::HS256))
		.map_err(|_| Error::Unauthorized)?;
	Ok(token_data.claims)
}


// vim: ts=4
