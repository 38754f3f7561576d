//! Password hashing and signed session tokens.

use crate::errors::{AppError, Result};
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Hashes a plain-text password using Argon2.
#[instrument(name = "auth_service::hash_password", skip(password))]
pub fn hash_password(password: &str) -> Result<String> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a plain-text password against a stored Argon2 hash. `Ok(false)`
/// means the password simply does not match.
#[instrument(name = "auth_service::verify_password", skip_all)]
pub fn verify_password(hashed_password: &str, provided_password: &str) -> Result<bool> {
  let parsed_hash = PasswordHash::new(hashed_password)
    .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(e) => Err(AppError::Internal(format!("Password verification failed: {}", e))),
  }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  sub: Uuid,
  exp: i64,
}

/// Mints a signed session token carrying the user id.
pub fn issue_token(user_id: Uuid, secret: &str, ttl_secs: i64) -> Result<String> {
  let claims = Claims {
    sub: user_id,
    exp: Utc::now().timestamp() + ttl_secs,
  };
  encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(secret.as_bytes()),
  )
  .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Verifies signature and expiry, returning the user id the token was minted
/// for. The distinct expired/invalid messages surface directly in 401 bodies.
pub fn verify_token(token: &str, secret: &str) -> Result<Uuid> {
  match decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &Validation::default(),
  ) {
    Ok(data) => {
      debug!(user_id = %data.claims.sub, "Session token verified");
      Ok(data.claims.sub)
    }
    Err(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) => {
      Err(AppError::Auth("Token expired".to_string()))
    }
    Err(_) => Err(AppError::Auth("Invalid token".to_string())),
  }
}
