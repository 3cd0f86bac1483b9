//! Product catalog endpoints, mounted under `/api/products`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::StaffAuth;
use crate::error::{AppError, Result};
use crate::models::product::{
    CreateProductRequest, CreateVariationRequest, Product, RateProductRequest, Rating,
    UpdateStatusRequest, Variation,
};
use crate::services::overlay::OverlayRequest;
use crate::state::AppState;

fn make_sku() -> String {
    format!("SKU-{:08}", rand::random::<u32>())
}

/// `POST /api/products/add` (staff).
pub async fn add_product(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    let product: Product = sqlx::query_as(
        "INSERT INTO products
             (id, sku, name, slug, description, category, subcategory, size, color,
              unit, moq, original_price, discounted_price, quantity, images)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(make_sku())
    .bind(&req.name)
    .bind(&req.slug)
    .bind(&req.description)
    .bind(&req.category)
    .bind(&req.subcategory)
    .bind(&req.size)
    .bind(&req.color)
    .bind(&req.unit)
    .bind(req.moq)
    .bind(req.original_price)
    .bind(req.discounted_price)
    .bind(req.quantity)
    .bind(&req.images)
    .fetch_one(&s.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product added successfully!", "newProduct": product })),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkParams {
    pub sort_by: Option<String>,
}

/// `POST /api/products/all` (staff): bulk replace: drops rows missing
/// name/category or with a non-positive price, dedups by name, applies
/// the optional sort, then swaps the whole catalog.
pub async fn add_all_products(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Query(params): Query<BulkParams>,
    Json(body): Json<Vec<CreateProductRequest>>,
) -> Result<Json<serde_json::Value>> {
    let mut seen = std::collections::HashSet::new();
    let mut valid: Vec<CreateProductRequest> = body
        .into_iter()
        .filter(|p| {
            !p.name.is_empty() && !p.category.is_empty() && p.original_price > Decimal::ZERO
        })
        .filter(|p| seen.insert(p.name.clone()))
        .collect();
    if valid.is_empty() {
        return Err(AppError::invalid("No valid products to add."));
    }

    match params.sort_by.as_deref() {
        Some("price_desc") => valid.sort_by(|a, b| b.original_price.cmp(&a.original_price)),
        Some("price_asc") => valid.sort_by(|a, b| a.original_price.cmp(&b.original_price)),
        // recently_added and unknown values keep the submitted order.
        _ => {}
    }

    let mut tx = s.db.begin().await?;
    sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
    for p in &valid {
        sqlx::query(
            "INSERT INTO products
                 (id, sku, name, slug, description, category, subcategory, size, color,
                  unit, moq, original_price, discounted_price, quantity, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(Uuid::now_v7())
        .bind(make_sku())
        .bind(&p.name)
        .bind(&p.slug)
        .bind(&p.description)
        .bind(&p.category)
        .bind(&p.subcategory)
        .bind(&p.size)
        .bind(&p.color)
        .bind(&p.unit)
        .bind(p.moq)
        .bind(p.original_price)
        .bind(p.discounted_price)
        .bind(p.quantity)
        .bind(&p.images)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(Json(json!({ "message": "Products added successfully!" })))
}

/// `GET /api/products/getall`.
pub async fn get_all_products(State(s): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = sqlx::query_as("SELECT * FROM products ORDER BY created_at DESC")
        .fetch_all(&s.db)
        .await?;
    Ok(Json(products))
}

/// `GET /api/products/show`: storefront-visible products only.
pub async fn get_showing_products(State(s): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products =
        sqlx::query_as("SELECT * FROM products WHERE status = 'Show' ORDER BY created_at DESC")
            .fetch_all(&s.db)
            .await?;
    Ok(Json(products))
}

/// `GET /api/products/discount`.
pub async fn get_discounted_products(State(s): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = sqlx::query_as(
        "SELECT * FROM products
         WHERE discounted_price > 0 AND discounted_price < original_price
         ORDER BY created_at DESC",
    )
    .fetch_all(&s.db)
    .await?;
    Ok(Json(products))
}

/// `GET /api/products/stock-out`.
pub async fn get_stock_out_products(State(s): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products =
        sqlx::query_as("SELECT * FROM products WHERE quantity < 1 ORDER BY created_at DESC")
            .fetch_all(&s.db)
            .await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct FieldSearchParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// `GET /api/products/getall-search`: per-field case-insensitive match.
pub async fn get_products_by_fields(
    State(s): State<AppState>,
    Query(p): Query<FieldSearchParams>,
) -> Result<Json<Vec<Product>>> {
    let products = sqlx::query_as(
        "SELECT * FROM products
         WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
           AND ($2::text IS NULL OR description ILIKE '%' || $2 || '%')
           AND ($3::text IS NULL OR category ILIKE '%' || $3 || '%')
         ORDER BY created_at DESC",
    )
    .bind(&p.name)
    .bind(&p.description)
    .bind(&p.category)
    .fetch_all(&s.db)
    .await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// `GET /api/products/search?query=`: one term over name, description
/// and category.
pub async fn search_products(
    State(s): State<AppState>,
    Query(p): Query<SearchParams>,
) -> Result<Json<serde_json::Value>> {
    let query = p
        .query
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::invalid("Query parameter is required"))?;
    let products: Vec<Product> = sqlx::query_as(
        "SELECT * FROM products
         WHERE name ILIKE '%' || $1 || '%'
            OR description ILIKE '%' || $1 || '%'
            OR category ILIKE '%' || $1 || '%'
         ORDER BY created_at DESC",
    )
    .bind(&query)
    .fetch_all(&s.db)
    .await?;
    Ok(Json(json!({ "products": products })))
}

/// `GET /api/products/category/:category`: one route for every
/// category instead of a handler per hardcoded category name.
pub async fn get_products_by_category(
    State(s): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let products =
        sqlx::query_as("SELECT * FROM products WHERE category = $1 ORDER BY created_at DESC")
            .bind(&category)
            .fetch_all(&s.db)
            .await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarParams {
    pub filter_by: String,
}

#[derive(Debug, Deserialize)]
pub struct SimilarBody {
    pub value: serde_json::Value,
}

/// `GET /api/products/similar?filterBy=price|name`.
pub async fn get_similar_products(
    State(s): State<AppState>,
    Query(params): Query<SimilarParams>,
    Json(body): Json<SimilarBody>,
) -> Result<Json<Vec<Product>>> {
    let products: Vec<Product> = match params.filter_by.as_str() {
        "price" => {
            let price: Decimal = serde_json::from_value(body.value)
                .map_err(|_| AppError::invalid("Both 'value' and 'filterBy' are required"))?;
            sqlx::query_as(
                "SELECT * FROM products WHERE original_price = $1 ORDER BY created_at DESC",
            )
            .bind(price)
            .fetch_all(&s.db)
            .await?
        }
        "name" => {
            let name = body
                .value
                .as_str()
                .ok_or_else(|| AppError::invalid("Both 'value' and 'filterBy' are required"))?
                .to_string();
            sqlx::query_as(
                "SELECT * FROM products WHERE name ILIKE '%' || $1 || '%' ORDER BY created_at DESC",
            )
            .bind(name)
            .fetch_all(&s.db)
            .await?
        }
        _ => return Err(AppError::invalid("Invalid filter. Use 'price' or 'name'")),
    };
    if products.is_empty() {
        return Err(AppError::not_found("No similar products found"));
    }
    Ok(Json(products))
}

/// `GET /api/products/singleproduct/:id`.
pub async fn get_product_by_id(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>> {
    let product = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// `GET /api/products/:slug`.
pub async fn get_product_by_slug(
    State(s): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = sqlx::query_as("SELECT * FROM products WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// `PUT /api/products/update-product/:id` (staff).
pub async fn update_product(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<serde_json::Value>> {
    let product: Product = sqlx::query_as(
        "UPDATE products SET
             name = $2, slug = $3, description = $4, category = $5, subcategory = $6,
             size = $7, color = $8, unit = $9, moq = $10, original_price = $11,
             discounted_price = $12, quantity = $13, images = $14, updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.slug)
    .bind(&req.description)
    .bind(&req.category)
    .bind(&req.subcategory)
    .bind(&req.size)
    .bind(&req.color)
    .bind(&req.unit)
    .bind(req.moq)
    .bind(req.original_price)
    .bind(req.discounted_price)
    .bind(req.quantity)
    .bind(&req.images)
    .fetch_optional(&s.db)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(json!({ "data": product, "message": "Product updated successfully!" })))
}

/// `PUT /api/products/status/:id` (staff): Show/Hide toggle.
pub async fn update_product_status(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>> {
    let updated = sqlx::query("UPDATE products SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(req.status.as_str())
        .execute(&s.db)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }
    Ok(Json(json!({
        "message": format!("Product {} Successfully!", req.status.as_str())
    })))
}

/// `DELETE /api/products/delete-product/:id` (staff).
pub async fn delete_product(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }
    Ok(Json(json!({ "message": "Product Deleted Successfully!" })))
}

/// `POST /api/products/rate/:userId`: one rating per user per product.
pub async fn submit_rating(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<RateProductRequest>,
) -> Result<impl IntoResponse> {
    req.validate()?;

    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(req.product_id)
        .fetch_optional(&s.db)
        .await?;
    if product.is_none() {
        return Err(AppError::not_found("Product not found"));
    }

    let already: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM product_ratings WHERE product_id = $1 AND user_id = $2")
            .bind(req.product_id)
            .bind(user_id)
            .fetch_optional(&s.db)
            .await?;
    if already.is_some() {
        return Err(AppError::conflict("You have already rated this product"));
    }

    let mut tx = s.db.begin().await?;
    let rating: Rating = sqlx::query_as(
        "INSERT INTO product_ratings (id, product_id, user_id, rating, comment)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(req.product_id)
    .bind(user_id)
    .bind(req.rating)
    .bind(&req.comment)
    .fetch_one(&mut *tx)
    .await?;

    // Derived average and count live on the product row.
    let product: Product = sqlx::query_as(
        "UPDATE products SET
             average_rating = (SELECT AVG(rating) FROM product_ratings WHERE product_id = $1),
             review_count = (SELECT COUNT(*) FROM product_ratings WHERE product_id = $1),
             updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(req.product_id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Rating submitted successfully!",
            "product": product,
            "rating": rating,
        })),
    ))
}

/// `GET /api/products/ratings/:productId`.
pub async fn get_product_ratings(
    State(s): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&s.db)
        .await?;
    if product.is_none() {
        return Err(AppError::not_found("Product not found"));
    }
    let ratings: Vec<Rating> = sqlx::query_as(
        "SELECT * FROM product_ratings WHERE product_id = $1 ORDER BY created_at DESC",
    )
    .bind(product_id)
    .fetch_all(&s.db)
    .await?;
    Ok(Json(json!({ "ratings": ratings })))
}

/// `POST /api/products/variations/:id` (staff): add a priced
/// paper/color/quantity configuration.
pub async fn add_variation(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<CreateVariationRequest>,
) -> Result<impl IntoResponse> {
    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&s.db)
        .await?;
    if product.is_none() {
        return Err(AppError::not_found("Product not found"));
    }
    let variation: Variation = sqlx::query_as(
        "INSERT INTO product_variations
             (id, product_id, paper_size, paper_name, color, quantity_tier, price)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(product_id)
    .bind(&req.paper_size)
    .bind(&req.paper_name)
    .bind(&req.color)
    .bind(req.quantity_tier)
    .bind(req.price)
    .fetch_one(&s.db)
    .await?;
    Ok((StatusCode::CREATED, Json(variation)))
}

/// `GET /api/products/variations/:id`.
pub async fn list_variations(
    State(s): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Vec<Variation>>> {
    let variations =
        sqlx::query_as("SELECT * FROM product_variations WHERE product_id = $1")
            .bind(product_id)
            .fetch_all(&s.db)
            .await?;
    Ok(Json(variations))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTemplateRequest {
    pub template_url: String,
    pub name_text: String,
    pub contact_number: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub logo_image_url: Option<String>,
}

/// `POST /api/products/generate-template/:id`: run the overlay
/// pipeline and append the derived asset URL to the product.
pub async fn generate_template(
    State(s): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<GenerateTemplateRequest>,
) -> Result<Json<serde_json::Value>> {
    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&s.db)
        .await?;
    if product.is_none() {
        return Err(AppError::not_found("Product not found"));
    }

    let url = s
        .overlay
        .transform(&OverlayRequest {
            template_url: req.template_url,
            name_text: req.name_text,
            contact_number: req.contact_number,
            month: req.month,
            year: req.year,
            logo_image_url: req.logo_image_url,
        })
        .await?;

    // Accumulate; earlier results are never overwritten.
    let product: Product = sqlx::query_as(
        "UPDATE products SET template_images = array_append(template_images, $2),
             updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(product_id)
    .bind(&url)
    .fetch_one(&s.db)
    .await?;

    Ok(Json(json!({
        "status": true,
        "message": "Template generated successfully!",
        "imageUrl": url,
        "templateImages": product.template_images,
    })))
}
