//! Staff management endpoints, mounted under `/api/staff`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{self, StaffAuth};
use crate::error::{AppError, Result};
use crate::models::staff::{CreateStaffRequest, Staff, UpdateStaffRequest};
use crate::state::AppState;

/// `POST /api/staff/add` (staff).
pub async fn add_staff(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Json(req): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    req.validate()?;
    let email = req.email.to_lowercase();

    let duplicate: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM staff WHERE email = $1")
        .bind(&email)
        .fetch_optional(&s.db)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::conflict("This Email already Added!"));
    }

    let hash = auth::hash_password(&req.password)?;
    let staff: Staff = sqlx::query_as(
        "INSERT INTO staff (id, name, email, password, contact_number, staff_role)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&req.name)
    .bind(&email)
    .bind(&hash)
    .bind(&req.contact_number)
    .bind(req.staff_role.as_str())
    .fetch_one(&s.db)
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Staff Added Successfully!", "staff": staff })),
    ))
}

/// `GET /api/staff/all` (staff).
pub async fn get_all_staff(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
) -> Result<Json<Vec<Staff>>> {
    let staff = sqlx::query_as("SELECT * FROM staff ORDER BY joining_date DESC")
        .fetch_all(&s.db)
        .await?;
    Ok(Json(staff))
}

/// `GET /api/staff/:id` (staff).
pub async fn get_staff_by_id(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Staff>> {
    let staff: Staff = sqlx::query_as("SELECT * FROM staff WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Staff not found"))?;
    Ok(Json(staff))
}

/// `PUT /api/staff/:id` (staff).
pub async fn update_staff(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStaffRequest>,
) -> Result<Json<serde_json::Value>> {
    let updated = sqlx::query(
        "UPDATE staff SET
             name = COALESCE($2, name),
             email = COALESCE($3, email),
             contact_number = COALESCE($4, contact_number),
             staff_role = COALESCE($5, staff_role),
             updated_at = NOW()
         WHERE id = $1",
    )
    .bind(id)
    .bind(&req.name)
    .bind(req.email.as_ref().map(|e| e.to_lowercase()))
    .bind(&req.contact_number)
    .bind(req.staff_role.map(|r| r.as_str()))
    .execute(&s.db)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Staff not found"));
    }
    Ok(Json(json!({ "message": "Staff Updated Successfully!" })))
}

/// `DELETE /api/staff/:id` (staff).
pub async fn delete_staff(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let deleted = sqlx::query("DELETE FROM staff WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Staff not found"));
    }
    Ok(Json(json!({ "message": "Staff Deleted Successfully!" })))
}
