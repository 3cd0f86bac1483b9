//! Admin endpoints, mounted under `/api/admin`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{self, Role};
use crate::error::{AppError, Result};
use crate::models::staff::{Admin, RegisterAdminRequest, UpdateAdminRequest};
use crate::models::user::{ForgetPasswordRequest, LoginRequest, ResetPasswordRequest};
use crate::state::AppState;

/// `POST /api/admin/register`.
pub async fn register_admin(
    State(s): State<AppState>,
    Json(req): Json<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    req.validate()?;
    let email = req.email.to_lowercase();

    let duplicate: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM admins WHERE email = $1")
        .bind(&email)
        .fetch_optional(&s.db)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::conflict("This Email already Added!"));
    }

    let hash = auth::hash_password(&req.password)?;
    let admin: Admin = sqlx::query_as(
        "INSERT INTO admins (id, name, email, password, role)
         VALUES ($1, $2, $3, $4, COALESCE($5, 'Admin'))
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&req.name)
    .bind(&email)
    .bind(&hash)
    .bind(&req.role)
    .fetch_one(&s.db)
    .await?;

    let token = auth::sign_token(admin.id, Role::Admin, &s.config.jwt_secret)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": token,
            "_id": admin.id,
            "name": admin.name,
            "email": admin.email,
            "role": admin.role,
        })),
    ))
}

/// `POST /api/admin/login`.
pub async fn login_admin(
    State(s): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    let admin: Option<Admin> = sqlx::query_as("SELECT * FROM admins WHERE email = $1")
        .bind(req.email.to_lowercase())
        .fetch_optional(&s.db)
        .await?;

    let admin = admin.ok_or_else(|| AppError::Unauthorized("Invalid user or password!".into()))?;
    if !auth::verify_password(&req.password, &admin.password)? {
        return Err(AppError::Unauthorized("Invalid user or password!".into()));
    }

    let token = auth::sign_token(admin.id, Role::Admin, &s.config.jwt_secret)?;
    Ok(Json(json!({
        "token": token,
        "_id": admin.id,
        "name": admin.name,
        "email": admin.email,
        "role": admin.role,
        "image": admin.image,
    })))
}

/// `PUT /api/admin/forget-password`: same reset-token flow as users;
/// the token is returned for the mail collaborator to send.
pub async fn forget_password(
    State(s): State<AppState>,
    Json(req): Json<ForgetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    let admin: Admin = sqlx::query_as("SELECT * FROM admins WHERE email = $1")
        .bind(req.verify_email.to_lowercase())
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Admin Not found with this email!"))?;

    let token = auth::sign_reset_token(admin.id, &s.config.jwt_secret)?;
    Ok(Json(json!({
        "status": true,
        "message": "Please check your email to reset password!",
        "token": token,
    })))
}

/// `PUT /api/admin/reset-password`.
pub async fn reset_password(
    State(s): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    req.validate()?;
    let claims = auth::decode_reset_token(&req.token, &s.config.jwt_secret)?;

    let hash = auth::hash_password(&req.new_password)?;
    let updated = sqlx::query("UPDATE admins SET password = $2, updated_at = NOW() WHERE id = $1")
        .bind(claims.sub)
        .bind(&hash)
        .execute(&s.db)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Admin not found"));
    }
    Ok(Json(json!({
        "status": true,
        "message": "Your password change successful, you can login now!",
    })))
}

/// `PUT /api/admin/:id`: profile update, returns a refreshed token.
pub async fn update_admin(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAdminRequest>,
) -> Result<Json<serde_json::Value>> {
    let admin: Admin = sqlx::query_as(
        "UPDATE admins SET
             name = COALESCE($2, name),
             email = COALESCE($3, email),
             phone = COALESCE($4, phone),
             address = COALESCE($5, address),
             country = COALESCE($6, country),
             city = COALESCE($7, city),
             image = COALESCE($8, image),
             updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&req.name)
    .bind(req.email.as_ref().map(|e| e.to_lowercase()))
    .bind(&req.phone)
    .bind(&req.address)
    .bind(&req.country)
    .bind(&req.city)
    .bind(&req.image)
    .fetch_optional(&s.db)
    .await?
    .ok_or_else(|| AppError::not_found("Admin not found"))?;

    let token = auth::sign_token(admin.id, Role::Admin, &s.config.jwt_secret)?;
    Ok(Json(json!({
        "token": token,
        "_id": admin.id,
        "name": admin.name,
        "email": admin.email,
        "phone": admin.phone,
        "address": admin.address,
        "country": admin.country,
        "city": admin.city,
        "image": admin.image,
        "role": admin.role,
        "message": "Admin updated successfully!",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_reset_token_round_trip() {
        let id = Uuid::now_v7();
        let token = auth::sign_reset_token(id, "secret").unwrap();
        let claims = auth::decode_reset_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, id);
    }
}
