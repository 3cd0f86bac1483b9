//! Cart manager endpoints, mounted under `/api/users`.

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::domain::cart::{self, Applied, CartCommandError};
use crate::error::{AppError, Result};
use crate::models::cart::{
    Cart, CartItem, CartLineView, CartView, RemoveCartItemRequest, UpsertCartRequest,
};
use crate::models::product::Product;
use crate::state::AppState;

/// `POST /api/users/cart/:userId`: add/increment/decrement/set a line item.
pub async fn upsert_cart(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpsertCartRequest>,
) -> Result<Json<serde_json::Value>> {
    let user_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&s.db)
        .await?;
    if user_exists.is_none() {
        return Err(AppError::invalid("Invalid user ID"));
    }

    let product: Product = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(req.product_id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::invalid("Product not found"))?;

    // Lazily create the user's cart.
    let cart: Cart = sqlx::query_as(
        "INSERT INTO carts (id, user_id) VALUES ($1, $2)
         ON CONFLICT (user_id) DO UPDATE SET updated_at = NOW()
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .fetch_one(&s.db)
    .await?;

    let existing: Option<CartItem> =
        sqlx::query_as("SELECT * FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart.id)
            .bind(req.product_id)
            .fetch_optional(&s.db)
            .await?;

    let quantity = match existing {
        Some(item) => {
            match cart::apply(item.quantity, req.action)
                .map_err(|e| AppError::invalid(e.to_string()))?
            {
                Applied::Quantity(q) => {
                    sqlx::query("UPDATE cart_items SET quantity = $2 WHERE id = $1")
                        .bind(item.id)
                        .bind(q)
                        .execute(&s.db)
                        .await?;
                    q
                }
                Applied::Remove => {
                    sqlx::query("DELETE FROM cart_items WHERE id = $1")
                        .bind(item.id)
                        .execute(&s.db)
                        .await?;
                    0
                }
            }
        }
        None => {
            let quantity = cart::initial_quantity(req.action).map_err(initial_quantity_error)?;

            // Variation price overrides the product price when selected.
            let unit_price = match req.variation_id {
                Some(variation_id) => {
                    let row: Option<(Decimal, String, String)> = sqlx::query_as(
                        "SELECT price, paper_name, paper_size FROM product_variations
                         WHERE id = $1 AND product_id = $2",
                    )
                    .bind(variation_id)
                    .bind(req.product_id)
                    .fetch_optional(&s.db)
                    .await?;
                    let (price, paper_name, paper_size) =
                        row.ok_or_else(|| AppError::invalid("Variation not found"))?;
                    sqlx::query(
                        "UPDATE carts SET variation_id = $2, variation_snapshot = $3 WHERE id = $1",
                    )
                    .bind(cart.id)
                    .bind(variation_id)
                    .bind(json!({
                        "paperName": paper_name,
                        "paperSize": paper_size,
                        "price": price,
                    }))
                    .execute(&s.db)
                    .await?;
                    price
                }
                None => product.original_price,
            };

            sqlx::query(
                "INSERT INTO cart_items (id, cart_id, product_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::now_v7())
            .bind(cart.id)
            .bind(req.product_id)
            .bind(quantity)
            .bind(unit_price)
            .execute(&s.db)
            .await?;

            // Denormalized flag, set on first add.
            sqlx::query("UPDATE products SET is_in_cart = TRUE WHERE id = $1")
                .bind(req.product_id)
                .execute(&s.db)
                .await?;
            quantity
        }
    };

    let sub_total = recalculate_totals(&s.db, cart.id).await?;

    Ok(Json(json!({
        "status": true,
        "message": "Product updated in cart",
        "product": {
            "name": product.name,
            "quantity": quantity,
            "originalPrice": product.original_price,
            "images": product.images,
            "isInCart": true,
        },
        "subTotal": sub_total,
        "cartTotal": sub_total,
    })))
}

/// `GET /api/users/getcart/:userId`: cart with current product display
/// data; prunes line items whose product no longer resolves.
pub async fn get_cart(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CartView>> {
    let cart: Option<Cart> = sqlx::query_as("SELECT * FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&s.db)
        .await?;
    let Some(cart) = cart else {
        return Ok(Json(CartView::empty()));
    };

    let items: Vec<CartItem> = sqlx::query_as("SELECT * FROM cart_items WHERE cart_id = $1")
        .bind(cart.id)
        .fetch_all(&s.db)
        .await?;

    let mut lines = Vec::with_capacity(items.len());
    let mut pruned = false;
    for item in items {
        let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
            .bind(item.product_id)
            .fetch_optional(&s.db)
            .await?;
        match product {
            Some(p) => lines.push(display_line(p, item.quantity)),
            None => {
                sqlx::query("DELETE FROM cart_items WHERE id = $1")
                    .bind(item.id)
                    .execute(&s.db)
                    .await?;
                pruned = true;
            }
        }
    }
    // Displayed totals track current prices; the stored totals always
    // come from the snapshot unit_price, as after any other mutation.
    let total: Decimal = lines.iter().map(|l| l.item_total).sum();
    if pruned {
        recalculate_totals(&s.db, cart.id).await?;
    }

    Ok(Json(CartView {
        status: true,
        cart: lines,
        cart_total: total,
        sub_total: total,
    }))
}

/// `DELETE /api/users/delete-cart/:userId`: remove one line item.
pub async fn remove_cart_item(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<RemoveCartItemRequest>,
) -> Result<Json<serde_json::Value>> {
    let cart: Cart = sqlx::query_as(
        "SELECT c.* FROM carts c JOIN users u ON u.id = c.user_id WHERE c.user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(&s.db)
    .await?
    .ok_or_else(|| AppError::not_found("User or cart not found"))?;

    let deleted = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
        .bind(cart.id)
        .bind(req.product_id)
        .execute(&s.db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found in cart"));
    }

    let sub_total = recalculate_totals(&s.db, cart.id).await?;
    let cart: Cart = sqlx::query_as("SELECT * FROM carts WHERE id = $1")
        .bind(cart.id)
        .fetch_one(&s.db)
        .await?;

    Ok(Json(json!({
        "status": true,
        "message": "Product removed from cart successfully",
        "cart": cart,
        "subTotal": sub_total,
    })))
}

/// Line item as the storefront displays it, priced at the product's
/// current price rather than the stored snapshot.
fn display_line(p: Product, quantity: i32) -> CartLineView {
    CartLineView {
        product: p.id,
        title: p.name,
        price: p.original_price,
        description: p.description,
        images: p.images,
        category: p.category,
        quantity,
        item_total: p.original_price * Decimal::from(quantity),
    }
}

fn initial_quantity_error(e: CartCommandError) -> AppError {
    match e {
        CartCommandError::MissingLineItem => AppError::not_found(e.to_string()),
        CartCommandError::NonPositiveQuantity => AppError::invalid(e.to_string()),
    }
}

/// Persist sum of unit_price * quantity into both cart total columns.
async fn recalculate_totals(db: &sqlx::PgPool, cart_id: Uuid) -> Result<Decimal> {
    let (sub_total,): (Decimal,) = sqlx::query_as(
        "SELECT COALESCE(SUM(unit_price * quantity), 0) FROM cart_items WHERE cart_id = $1",
    )
    .bind(cart_id)
    .fetch_one(db)
    .await?;
    sqlx::query("UPDATE carts SET sub_total = $2, cart_total = $2, updated_at = NOW() WHERE id = $1")
        .bind(cart_id)
        .bind(sub_total)
        .execute(db)
        .await?;
    Ok(sub_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use crate::domain::cart::CartAction;

    #[test]
    fn test_decrement_absent_item_renders_not_found() {
        let err = cart::initial_quantity(CartAction::Decrement)
            .map_err(initial_quantity_error)
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_quantity_renders_bad_request() {
        let err = cart::initial_quantity(CartAction::Set { quantity: 0 })
            .map_err(initial_quantity_error)
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_display_line_uses_current_price() {
        let now = chrono::Utc::now();
        let p = Product {
            id: Uuid::new_v4(),
            sku: "SKU-00000001".into(),
            name: "Business Cards".into(),
            slug: "business-cards".into(),
            description: String::new(),
            category: "cards".into(),
            subcategory: String::new(),
            size: String::new(),
            color: String::new(),
            unit: String::new(),
            moq: 0,
            original_price: Decimal::new(120, 0),
            discounted_price: Decimal::ZERO,
            quantity: 10,
            sold: 0,
            images: vec![],
            template_images: vec![],
            status: "Show".into(),
            is_in_cart: true,
            is_in_wishlist: false,
            average_rating: Decimal::ZERO,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };
        let line = display_line(p, 3);
        assert_eq!(line.price, Decimal::new(120, 0));
        assert_eq!(line.item_total, Decimal::new(360, 0));
    }
}
