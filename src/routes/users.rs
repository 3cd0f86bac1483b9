//! User account endpoints, mounted under `/api/users`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{self, Role, StaffAuth};
use crate::error::{AppError, Result};
use crate::models::address::ShippingAddress;
use crate::models::product::Product;
use crate::models::user::{
    AuthResponse, ChangePasswordRequest, ForgetPasswordRequest, LoginRequest,
    ProviderSignupRequest, RegisterRequest, ResetPasswordRequest, UpdateUserRequest, User,
};
use crate::state::AppState;

fn auth_response(user: &User, token: String, message: Option<&str>) -> AuthResponse {
    AuthResponse {
        token,
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        address: user.address.clone(),
        phone: user.phone.clone(),
        image: user.image.clone(),
        message: message.map(str::to_string),
    }
}

/// `POST /api/users/register`.
pub async fn register(
    State(s): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    req.validate()?;
    let email = req.email.to_lowercase();

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&s.db)
        .await?;
    if existing.is_some() {
        // The storefront client relies on 403 here.
        return Ok((
            StatusCode::FORBIDDEN,
            Json(json!({ "status": false, "message": "This Email already Added!" })),
        )
            .into_response());
    }

    let hash = auth::hash_password(&req.password)?;
    let user: User = sqlx::query_as(
        "INSERT INTO users (id, name, email, password) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&req.name)
    .bind(&email)
    .bind(&hash)
    .fetch_one(&s.db)
    .await?;

    let token = auth::sign_token(user.id, Role::User, &s.config.jwt_secret)?;
    Ok(Json(auth_response(&user, token, Some("Registration successful, please login now!"))).into_response())
}

/// `POST /api/users/login`.
pub async fn login(
    State(s): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(req.email.to_lowercase())
        .fetch_optional(&s.db)
        .await?;

    let user = user.ok_or_else(|| AppError::Unauthorized("Invalid user or password!".into()))?;
    let hash = user
        .password
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Invalid user or password!".into()))?;
    if !auth::verify_password(&req.password, hash)? {
        return Err(AppError::Unauthorized("Invalid user or password!".into()));
    }

    let token = auth::sign_token(user.id, Role::User, &s.config.jwt_secret)?;
    Ok(Json(auth_response(&user, token, None)))
}

/// `POST /api/users/signup`: provider sign-in: find-or-create by
/// email, no password stored.
pub async fn signup_with_provider(
    State(s): State<AppState>,
    Json(req): Json<ProviderSignupRequest>,
) -> Result<Json<AuthResponse>> {
    req.validate()?;
    let email = req.email.to_lowercase();

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&s.db)
        .await?;
    let user = match existing {
        Some(user) => user,
        None => {
            sqlx::query_as(
                "INSERT INTO users (id, name, email, image) VALUES ($1, $2, $3, $4) RETURNING *",
            )
            .bind(Uuid::now_v7())
            .bind(&req.name)
            .bind(&email)
            .bind(&req.image)
            .fetch_one(&s.db)
            .await?
        }
    };

    let token = auth::sign_token(user.id, Role::User, &s.config.jwt_secret)?;
    Ok(Json(auth_response(&user, token, None)))
}

/// `POST /api/users/change-password`.
pub async fn change_password(
    State(s): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    req.validate()?;
    let user: User = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(req.email.to_lowercase())
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("User Not found with this email!"))?;

    let Some(hash) = user.password.as_deref() else {
        return Ok(Json(json!({
            "status": false,
            "message": "For change password, you need to sign in with email & password!",
        })));
    };
    if !auth::verify_password(&req.current_password, hash)? {
        return Err(AppError::Unauthorized(
            "Invalid email or current password!".into(),
        ));
    }

    let new_hash = auth::hash_password(&req.new_password)?;
    sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
        .bind(user.id)
        .bind(&new_hash)
        .execute(&s.db)
        .await?;
    Ok(Json(json!({ "status": true, "message": "Your password change successfully!" })))
}

/// `PUT /api/users/forget-password`: issues a short-lived reset token.
/// Email delivery is an external collaborator; the token is returned
/// to the caller for it to send.
pub async fn forget_password(
    State(s): State<AppState>,
    Json(req): Json<ForgetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    let user: User = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(req.verify_email.to_lowercase())
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("User Not found with this email!"))?;

    let token = auth::sign_reset_token(user.id, &s.config.jwt_secret)?;
    Ok(Json(json!({
        "status": true,
        "message": "Please check your email to reset password!",
        "token": token,
    })))
}

/// `PUT /api/users/reset-password`.
pub async fn reset_password(
    State(s): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    req.validate()?;
    let claims = auth::decode_reset_token(&req.token, &s.config.jwt_secret)?;

    let hash = auth::hash_password(&req.new_password)?;
    let updated = sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
        .bind(claims.sub)
        .bind(&hash)
        .execute(&s.db)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("User not found"));
    }
    Ok(Json(json!({
        "status": true,
        "message": "Your password change successful, you can login now!",
    })))
}

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub search: Option<String>,
}

/// `GET /api/users` (staff): list with optional search filter.
pub async fn get_all_users(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Query(params): Query<UserListParams>,
) -> Result<Json<Vec<User>>> {
    let users = sqlx::query_as(
        "SELECT * FROM users
         WHERE $1::text IS NULL
            OR name ILIKE '%' || $1 || '%'
            OR email ILIKE '%' || $1 || '%'
            OR phone ILIKE '%' || $1 || '%'
         ORDER BY created_at DESC",
    )
    .bind(&params.search)
    .fetch_all(&s.db)
    .await?;
    Ok(Json(users))
}

/// `GET /api/users/:userId`.
pub async fn get_user_by_id(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(json!({
        "_id": user.id,
        "name": user.name,
        "email": user.email,
        "phone": user.phone,
    })))
}

/// `PUT /api/users/update-user/:userId`.
pub async fn update_user(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<AuthResponse>> {
    let user: User = sqlx::query_as(
        "UPDATE users SET
             name = COALESCE($2, name),
             email = COALESCE($3, email),
             address = COALESCE($4, address),
             phone = COALESCE($5, phone),
             updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(user_id)
    .bind(&req.name)
    .bind(req.email.as_ref().map(|e| e.to_lowercase()))
    .bind(&req.address)
    .bind(&req.phone)
    .fetch_optional(&s.db)
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    let token = auth::sign_token(user.id, Role::User, &s.config.jwt_secret)?;
    Ok(Json(auth_response(&user, token, None)))
}

/// `DELETE /api/users/:id`.
pub async fn delete_user(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("User not found"));
    }
    Ok(Json(json!({ "message": "User Deleted Successfully!" })))
}

/// `GET /api/users/get-shipping-address/:userId`: most recent address.
pub async fn get_shipping_address(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let address: ShippingAddress = sqlx::query_as(
        "SELECT * FROM shipping_addresses WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(&s.db)
    .await?
    .ok_or_else(|| AppError::not_found("Shipping address not found"))?;
    Ok(Json(json!({
        "status": true,
        "message": "Shipping address retrieved successfully",
        "shippingAddress": address,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub product_id: Uuid,
}

/// `POST /api/users/wishlist/:userId`: toggle membership.
pub async fn toggle_wishlist(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<WishlistRequest>,
) -> Result<Json<serde_json::Value>> {
    let user: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&s.db)
        .await?;
    if user.is_none() {
        return Err(AppError::not_found("User not found"));
    }
    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(req.product_id)
        .fetch_optional(&s.db)
        .await?;
    if product.is_none() {
        return Err(AppError::not_found("Product not found"));
    }

    let removed = sqlx::query(
        "DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2",
    )
    .bind(user_id)
    .bind(req.product_id)
    .execute(&s.db)
    .await?;

    let in_wishlist = if removed.rows_affected() > 0 {
        false
    } else {
        sqlx::query("INSERT INTO wishlist_items (user_id, product_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(req.product_id)
            .execute(&s.db)
            .await?;
        true
    };
    sqlx::query("UPDATE products SET is_in_wishlist = $2 WHERE id = $1")
        .bind(req.product_id)
        .bind(in_wishlist)
        .execute(&s.db)
        .await?;

    let message = if in_wishlist {
        "Product added to wishlist"
    } else {
        "Product removed from wishlist"
    };
    Ok(Json(json!({
        "status": true,
        "message": message,
        "isInWishlist": in_wishlist,
    })))
}

/// `GET /api/users/get-wishlist/:userId`.
pub async fn get_wishlist(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let user: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&s.db)
        .await?;
    if user.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let products: Vec<Product> = sqlx::query_as(
        "SELECT p.* FROM products p
         JOIN wishlist_items w ON w.product_id = p.id
         WHERE w.user_id = $1",
    )
    .bind(user_id)
    .fetch_all(&s.db)
    .await?;
    Ok(Json(json!({ "message": "Your wishlist is here", "wishlist": products })))
}
