//! Category endpoints, mounted under `/api/category`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::StaffAuth;
use crate::error::{AppError, Result};
use crate::models::category::{Category, CreateCategoryRequest};
use crate::state::AppState;

fn slugify(parent: &str) -> String {
    parent
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// `POST /api/category/add` (staff).
pub async fn add_category(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let slug = if req.slug.is_empty() {
        slugify(&req.parent)
    } else {
        req.slug
    };
    let category: Category = sqlx::query_as(
        "INSERT INTO categories (id, parent, slug, cat_type, icon, children)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&req.parent)
    .bind(&slug)
    .bind(&req.cat_type)
    .bind(&req.icon)
    .bind(&req.children)
    .fetch_one(&s.db)
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Category Added Successfully!", "category": category })),
    ))
}

/// `GET /api/category/all`.
pub async fn get_all_categories(State(s): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = sqlx::query_as("SELECT * FROM categories ORDER BY parent")
        .fetch_all(&s.db)
        .await?;
    Ok(Json(categories))
}

/// `GET /api/category/show`: only categories with status Show.
pub async fn get_showing_categories(State(s): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = sqlx::query_as("SELECT * FROM categories WHERE status = 'Show' ORDER BY parent")
        .fetch_all(&s.db)
        .await?;
    Ok(Json(categories))
}

/// `GET /api/category/:id`.
pub async fn get_category_by_id(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Category>> {
    let category: Category = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(Json(category))
}

/// `PUT /api/category/edit/:id` (staff).
pub async fn update_category(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Json<serde_json::Value>> {
    let slug = if req.slug.is_empty() {
        slugify(&req.parent)
    } else {
        req.slug
    };
    let updated = sqlx::query(
        "UPDATE categories SET parent = $2, slug = $3, cat_type = $4, icon = $5, children = $6
         WHERE id = $1",
    )
    .bind(id)
    .bind(&req.parent)
    .bind(&slug)
    .bind(&req.cat_type)
    .bind(&req.icon)
    .bind(&req.children)
    .execute(&s.db)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(Json(json!({ "message": "Category Updated Successfully!" })))
}

#[derive(Debug, Deserialize)]
pub struct CategoryStatusRequest {
    pub status: String,
}

/// `PUT /api/category/status/:id` (staff): Show / Hide.
pub async fn update_category_status(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CategoryStatusRequest>,
) -> Result<Json<serde_json::Value>> {
    if req.status != "Show" && req.status != "Hide" {
        return Err(AppError::invalid("Status must be Show or Hide"));
    }
    let updated = sqlx::query("UPDATE categories SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(&req.status)
        .execute(&s.db)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(Json(json!({ "message": format!("Category {} Successfully!", req.status) })))
}

/// `DELETE /api/category/:id` (staff).
pub async fn delete_category(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(Json(json!({ "message": "Category Deleted Successfully!" })))
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Business Cards"), "business-cards");
        assert_eq!(slugify("  Mugs  "), "mugs");
    }
}
