//! Coupon endpoints, mounted under `/api/coupon`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use crate::auth::StaffAuth;
use crate::error::{AppError, Result};
use crate::models::coupon::{Coupon, CouponRequest};
use crate::state::AppState;

/// `POST /api/coupon/add` (staff).
pub async fn add_coupon(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Json(req): Json<CouponRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let duplicate: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM coupons WHERE coupon_code = $1")
        .bind(&req.coupon_code)
        .fetch_optional(&s.db)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::conflict("Coupon code already exists"));
    }

    let coupon: Coupon = sqlx::query_as(
        "INSERT INTO coupons
             (id, title, logo, coupon_code, end_time, discount_percentage, minimum_amount, product_type)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&req.title)
    .bind(&req.logo)
    .bind(&req.coupon_code)
    .bind(req.end_time)
    .bind(req.discount_percentage)
    .bind(req.minimum_amount)
    .bind(&req.product_type)
    .fetch_one(&s.db)
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Coupon Added Successfully!", "coupon": coupon })),
    ))
}

/// `GET /api/coupon`: newest first.
pub async fn get_all_coupons(State(s): State<AppState>) -> Result<Json<Vec<Coupon>>> {
    let coupons = sqlx::query_as("SELECT * FROM coupons ORDER BY created_at DESC")
        .fetch_all(&s.db)
        .await?;
    Ok(Json(coupons))
}

/// `GET /api/coupon/:id`.
pub async fn get_coupon_by_id(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Coupon>> {
    let coupon: Coupon = sqlx::query_as("SELECT * FROM coupons WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Coupon not found"))?;
    Ok(Json(coupon))
}

/// `PUT /api/coupon/:id` (staff).
pub async fn update_coupon(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CouponRequest>,
) -> Result<Json<serde_json::Value>> {
    let updated = sqlx::query(
        "UPDATE coupons SET
             title = $2, logo = $3, coupon_code = $4, end_time = $5,
             discount_percentage = $6, minimum_amount = $7, product_type = $8,
             updated_at = NOW()
         WHERE id = $1",
    )
    .bind(id)
    .bind(&req.title)
    .bind(&req.logo)
    .bind(&req.coupon_code)
    .bind(req.end_time)
    .bind(req.discount_percentage)
    .bind(req.minimum_amount)
    .bind(&req.product_type)
    .execute(&s.db)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Coupon not found"));
    }
    Ok(Json(json!({ "message": "Coupon Updated Successfully!" })))
}

/// `DELETE /api/coupon/:id` (staff).
pub async fn delete_coupon(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let deleted = sqlx::query("DELETE FROM coupons WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Coupon not found"));
    }
    Ok(Json(json!({ "message": "Coupon Deleted Successfully!" })))
}
