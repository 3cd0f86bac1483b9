//! Order rows, snapshots, and request shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_method: String,
    pub amount: Decimal,
    pub currency: String,
    pub delivery_charge: Decimal,
    pub payment_status: String,
    pub shipping_address_id: Option<Uuid>,
    pub order_status: String,
    pub is_cancelled: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub delivered_in: Option<String>,
    pub placed_at: DateTime<Utc>,
    pub processing_start_time: DateTime<Utc>,
    pub shipping_start_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable snapshot of what was sold, copied at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub variation_snapshot: Option<serde_json::Value>,
}

/// One append-only history entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusEntry {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "COD")]
    Cod,
    #[serde(rename = "card")]
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cod => "COD",
            Self::Card => "card",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub payment_method: PaymentMethod,
    pub shipping_address: crate::models::address::ShippingAddressInput,
    /// Single-product fast path, bypassing the cart.
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub new_status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub order_id: Uuid,
    pub cancel_reasons: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    /// Caps the result to the 10 newest orders.
    #[serde(default)]
    pub recent: bool,
}
