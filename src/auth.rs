//! Password hashing and bearer-token authentication.
//!
//! Passwords are hashed with Argon2id in PHC string format. Access
//! tokens are HS256 JWTs carrying the subject id and a role claim;
//! staff/admin routes are guarded by the [`StaffAuth`] extractor so no
//! admin operation is reachable without a role-bearing token.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

const ACCESS_TOKEN_LIFETIME_SECS: i64 = 60 * 60 * 24 * 2;
const RESET_TOKEN_LIFETIME_SECS: i64 = 60 * 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Staff,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id (user, staff, or admin UUID).
    pub sub: Uuid,
    pub role: Role,
    /// Set to `"reset"` on password-reset tokens; absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("password hash: {e}")))
}

/// `Ok(true)` on match, `Ok(false)` on mismatch, `Err` on a malformed
/// stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("invalid stored hash: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!("password verify: {e}"))),
    }
}

pub fn sign_token(subject: Uuid, role: Role, secret: &str) -> Result<String, AppError> {
    issue(subject, role, None, ACCESS_TOKEN_LIFETIME_SECS, secret)
}

/// Short-lived token for the forget/reset password flow.
pub fn sign_reset_token(subject: Uuid, secret: &str) -> Result<String, AppError> {
    issue(
        subject,
        Role::User,
        Some("reset".to_string()),
        RESET_TOKEN_LIFETIME_SECS,
        secret,
    )
}

fn issue(
    subject: Uuid,
    role: Role,
    purpose: Option<String>,
    lifetime: i64,
    secret: &str,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: subject,
        role,
        purpose,
        iat: now,
        exp: now + lifetime,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("JWT encode: {e}")))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token Expired, Please try again!".to_string())
        }
        _ => AppError::Unauthorized("Invalid token".to_string()),
    })
}

/// Redeem a reset token, rejecting access tokens passed in its place.
pub fn decode_reset_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let claims = decode_token(token, secret)?;
    if claims.purpose.as_deref() != Some("reset") {
        return Err(AppError::Unauthorized("Invalid token".to_string()));
    }
    Ok(claims)
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))
}

/// Any authenticated principal.
pub struct AuthClaims(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthClaims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let claims = decode_token(bearer_token(parts)?, &app.config.jwt_secret)?;
        if claims.purpose.is_some() {
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }
        Ok(Self(claims))
    }
}

/// Staff-or-admin guard for back-office routes.
pub struct StaffAuth(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for StaffAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state).await?;
        match claims.role {
            Role::Staff | Role::Admin => Ok(Self(claims)),
            Role::User => Err(AppError::Unauthorized(
                "Staff access required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter2-hunter2").unwrap();
        assert!(verify_password("hunter2-hunter2", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_token_round_trip() {
        let id = Uuid::new_v4();
        let token = sign_token(id, Role::Staff, SECRET).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Staff);
        assert!(claims.purpose.is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_token(Uuid::new_v4(), Role::User, SECRET).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_reset_token_purpose_enforced() {
        let id = Uuid::new_v4();
        let access = sign_token(id, Role::User, SECRET).unwrap();
        assert!(decode_reset_token(&access, SECRET).is_err());

        let reset = sign_reset_token(id, SECRET).unwrap();
        let claims = decode_reset_token(&reset, SECRET).unwrap();
        assert_eq!(claims.sub, id);
    }
}
