//! Order workflow endpoints, mounted under `/api/order`.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::auth::StaffAuth;
use crate::domain::events::{self, DomainEvent};
use crate::domain::order_status::{can_cancel, OrderStatus};
use crate::error::{AppError, Result};
use crate::models::order::{
    CancelOrderRequest, CreateOrderRequest, Order, OrderItem, OrderListParams, PaymentMethod,
    StatusEntry, UpdateOrderStatusRequest,
};
use crate::models::product::Product;
use crate::services::invoice::{self, InvoiceLine};
use crate::state::AppState;

struct Snapshot {
    product_id: Uuid,
    name: String,
    category: String,
    quantity: i32,
    unit_price: Decimal,
    variation: Option<serde_json::Value>,
}

/// `POST /api/order/create-order/:userId`: convert the cart (or one
/// product) into an order inside a single transaction: address, order,
/// item snapshots, stock decrement, and seed history either all land
/// or none do.
pub async fn create_order(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse> {
    let user_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&s.db)
        .await?;
    if user_exists.is_none() {
        return Err(AppError::invalid("Invalid user ID"));
    }

    let snapshots = match req.product_id {
        Some(product_id) => {
            // Single-product fast path; quantity fixed at 1.
            let product: Product = sqlx::query_as("SELECT * FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&s.db)
                .await?
                .ok_or_else(|| AppError::invalid("Product not found"))?;
            vec![Snapshot {
                product_id: product.id,
                name: product.name,
                category: product.category,
                quantity: 1,
                unit_price: product.original_price,
                variation: None,
            }]
        }
        None => {
            let cart: Option<(Uuid, Option<serde_json::Value>)> = sqlx::query_as(
                "SELECT id, variation_snapshot FROM carts WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(&s.db)
            .await?;
            let Some((cart_id, variation)) = cart else {
                return Err(AppError::invalid("User cart is empty or does not exist."));
            };
            let rows: Vec<(Uuid, String, String, i32, Decimal)> = sqlx::query_as(
                "SELECT p.id, p.name, p.category, ci.quantity, ci.unit_price
                 FROM cart_items ci JOIN products p ON p.id = ci.product_id
                 WHERE ci.cart_id = $1",
            )
            .bind(cart_id)
            .fetch_all(&s.db)
            .await?;
            if rows.is_empty() {
                return Err(AppError::invalid("User cart is empty or does not exist."));
            }
            rows.into_iter()
                .map(|(product_id, name, category, quantity, unit_price)| Snapshot {
                    product_id,
                    name,
                    category,
                    quantity,
                    unit_price,
                    variation: variation.clone(),
                })
                .collect()
        }
    };

    let cart_total: Decimal = snapshots
        .iter()
        .map(|i| i.unit_price * Decimal::from(i.quantity))
        .sum();
    let amount = cart_total + s.config.delivery_charge;
    let initial_status = match req.payment_method {
        PaymentMethod::Cod => OrderStatus::Confirmed,
        PaymentMethod::Card => OrderStatus::Pending,
    };

    let mut tx = s.db.begin().await?;

    let address = &req.shipping_address;
    let address_id = Uuid::now_v7();
    sqlx::query(
        "INSERT INTO shipping_addresses
             (id, user_id, full_name, email, phone, address_line1, address_line2,
              city, state_region, country, postal_code)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(address_id)
    .bind(user_id)
    .bind(&address.full_name)
    .bind(&address.email)
    .bind(&address.phone)
    .bind(&address.address_line1)
    .bind(&address.address_line2)
    .bind(&address.city)
    .bind(&address.state_region)
    .bind(&address.country)
    .bind(&address.postal_code)
    .execute(&mut *tx)
    .await?;

    let order: Order = sqlx::query_as(
        "INSERT INTO orders
             (id, user_id, payment_method, amount, delivery_charge, payment_status,
              shipping_address_id, order_status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(req.payment_method.as_str())
    .bind(amount)
    .bind(s.config.delivery_charge)
    .bind(initial_status.as_str())
    .bind(address_id)
    .bind(initial_status.as_str())
    .fetch_one(&mut *tx)
    .await?;

    for item in &snapshots {
        sqlx::query(
            "INSERT INTO order_items
                 (id, order_id, product_id, name, category, quantity, unit_price, variation_snapshot)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(Uuid::now_v7())
        .bind(order.id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(&item.variation)
        .execute(&mut *tx)
        .await?;

        let decremented = sqlx::query(
            "UPDATE products SET quantity = quantity - $2, sold = sold + $2
             WHERE id = $1 AND quantity >= $2",
        )
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut *tx)
        .await?;
        if decremented.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Insufficient stock for {}",
                item.name
            )));
        }
    }

    sqlx::query("INSERT INTO order_status_history (id, order_id, status) VALUES ($1, $2, $3)")
        .bind(Uuid::now_v7())
        .bind(order.id)
        .bind(initial_status.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    events::publish(
        &s.nats,
        DomainEvent::OrderCreated {
            order_id: order.id,
            user_id,
            amount,
            status: initial_status,
        },
    )
    .await;
    for item in &snapshots {
        events::publish(
            &s.nats,
            DomainEvent::ProductSold {
                product_id: item.product_id,
                quantity: item.quantity,
            },
        )
        .await;
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": true,
            "message": "Order placed successfully",
            "data": order,
        })),
    ))
}

/// `GET /api/order/get-orders`: all orders, newest first; `recent`
/// caps the list to the 10 newest.
pub async fn get_all_orders(
    State(s): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Vec<Order>>> {
    let limit = if params.recent { 10 } else { i64::MAX };
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(&s.db)
            .await?;
    Ok(Json(orders))
}

/// `GET /api/order/getorder/:userId`: user's orders with resolved
/// product display data.
pub async fn get_user_orders(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let user_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&s.db)
        .await?;
    if user_exists.is_none() {
        return Err(AppError::invalid("Invalid user ID"));
    }

    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&s.db)
            .await?;
    if orders.is_empty() {
        return Err(AppError::not_found("Orders not found"));
    }

    let mut details = Vec::with_capacity(orders.len());
    for order in orders {
        let items: Vec<OrderItem> =
            sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1")
                .bind(order.id)
                .fetch_all(&s.db)
                .await?;
        let mut products = Vec::with_capacity(items.len());
        for item in items {
            let display: Option<(String, Decimal, Vec<String>)> = sqlx::query_as(
                "SELECT name, original_price, images FROM products WHERE id = $1",
            )
            .bind(item.product_id)
            .fetch_optional(&s.db)
            .await?;
            // Snapshot keeps deleted products presentable.
            let (title, price, images) =
                display.unwrap_or_else(|| (item.name.clone(), item.unit_price, vec![]));
            products.push(json!({
                "product": {
                    "_id": item.product_id,
                    "title": title,
                    "price": price,
                    "images": images,
                },
                "quantity": item.quantity,
                "_id": item.id,
            }));
        }
        details.push(json!({
            "orderId": order.id,
            "order": products,
            "orderStatus": order.order_status,
            "deliveredIn": order.delivered_in,
        }));
    }

    Ok(Json(json!({ "status": true, "orders": details })))
}

/// `GET /api/order/:id`: one order with its snapshots and history.
pub async fn get_order_by_id(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    let items: Vec<OrderItem> = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1")
        .bind(id)
        .fetch_all(&s.db)
        .await?;
    let history: Vec<StatusEntry> = sqlx::query_as(
        "SELECT * FROM order_status_history WHERE order_id = $1 ORDER BY occurred_at",
    )
    .bind(id)
    .fetch_all(&s.db)
    .await?;

    let mut body = serde_json::to_value(&order).map_err(|e| AppError::Internal(e.to_string()))?;
    body["products"] = serde_json::to_value(items).map_err(|e| AppError::Internal(e.to_string()))?;
    body["orderStatusHistory"] =
        serde_json::to_value(history).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(body))
}

/// `PUT /api/order/updateOrderStatus/:id`: append the previous status
/// to history, then overwrite. Repeated identical updates each append;
/// there is no dedup.
pub async fn update_order_status(
    State(s): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<serde_json::Value>> {
    let id: Uuid = id
        .parse()
        .map_err(|_| AppError::invalid("Invalid order ID"))?;
    let new_status: OrderStatus = req
        .new_status
        .parse()
        .map_err(|e: crate::domain::order_status::UnknownStatus| AppError::invalid(e.to_string()))?;

    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    let previous: OrderStatus = order
        .order_status
        .parse()
        .map_err(|_| AppError::Internal(format!("stored status {:?} unknown", order.order_status)))?;

    let mut tx = s.db.begin().await?;
    sqlx::query("INSERT INTO order_status_history (id, order_id, status) VALUES ($1, $2, $3)")
        .bind(Uuid::now_v7())
        .bind(id)
        .bind(previous.as_str())
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE orders SET order_status = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(new_status.as_str())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    events::publish(
        &s.nats,
        DomainEvent::OrderStatusChanged {
            order_id: id,
            from: previous,
            to: new_status,
        },
    )
    .await;

    Ok(Json(json!({ "status": true, "message": "Order Updated Successfully!" })))
}

/// `PUT /api/order/cancel-order-by-user/:userId`: the two guards, then
/// `CancelledRequest` with a timestamped history entry.
pub async fn cancel_order(
    State(s): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<CancelOrderRequest>,
) -> Result<Json<serde_json::Value>> {
    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(req.order_id)
        .bind(user_id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    let status: OrderStatus = order
        .order_status
        .parse()
        .map_err(|_| AppError::Internal(format!("stored status {:?} unknown", order.order_status)))?;
    can_cancel(status, order.is_cancelled).map_err(|e| AppError::conflict(e.to_string()))?;

    let now = Utc::now();
    let mut tx = s.db.begin().await?;
    sqlx::query(
        "UPDATE orders SET order_status = $2, is_cancelled = TRUE, cancelled_at = $3,
             cancel_reason = $4, updated_at = NOW()
         WHERE id = $1",
    )
    .bind(order.id)
    .bind(OrderStatus::CancelledRequest.as_str())
    .bind(now)
    .bind(&req.cancel_reasons)
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "INSERT INTO order_status_history (id, order_id, status, occurred_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::now_v7())
    .bind(order.id)
    .bind(OrderStatus::CancelledRequest.as_str())
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    events::publish(
        &s.nats,
        DomainEvent::OrderCancelled {
            order_id: order.id,
            user_id,
        },
    )
    .await;

    Ok(Json(json!({
        "status": true,
        "message": "Order cancellation requested",
        "cancelledAt": now,
    })))
}

/// `DELETE /api/order/:id`: items and history cascade; the order also
/// disappears from the owning user's order list (foreign key).
pub async fn delete_order(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let deleted = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Order not found"));
    }
    Ok(Json(json!({ "status": true, "message": "Order Deleted Successfully!" })))
}

/// `GET /api/order/dashboard-count`: admin dashboard counters.
pub async fn dashboard_count(
    StaffAuth(_claims): StaffAuth,
    State(s): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&s.db)
        .await?;
    let (today,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE created_at >= date_trunc('day', NOW())")
            .fetch_one(&s.db)
            .await?;
    let (this_month,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders WHERE created_at >= date_trunc('month', NOW())",
    )
    .fetch_one(&s.db)
    .await?;
    let (sales,): (Decimal,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0) FROM orders WHERE is_cancelled = FALSE",
    )
    .fetch_one(&s.db)
    .await?;

    Ok(Json(json!({
        "status": true,
        "totalOrders": total,
        "todayOrders": today,
        "monthOrders": this_month,
        "totalSales": sales,
    })))
}

/// `GET /api/order/download-invoice/:userId/:orderId`: streams the
/// rendered PDF.
pub async fn download_invoice(
    State(s): State<AppState>,
    Path((user_id, order_id)): Path<(Uuid, Uuid)>,
) -> Result<Response> {
    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    let items: Vec<OrderItem> = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1")
        .bind(order.id)
        .fetch_all(&s.db)
        .await?;
    let lines: Vec<InvoiceLine> = items
        .into_iter()
        .map(|i| InvoiceLine {
            name: i.name,
            quantity: i.quantity,
            unit_price: i.unit_price,
        })
        .collect();

    let invoice_number = order.id.simple().to_string();
    let issued_on = order.placed_at.format("%Y-%m-%d").to_string();
    let bytes = invoice::render(
        &s.config.store_name,
        &invoice_number,
        &issued_on,
        &order.currency,
        &lines,
    )?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"invoice-{invoice_number}.pdf\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
