//! Cart rows; one cart per user, created lazily on first add.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cart::CartAction;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub variation_id: Option<Uuid>,
    pub variation_snapshot: Option<serde_json::Value>,
    pub sub_total: Decimal,
    pub cart_total: Decimal,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertCartRequest {
    pub product_id: Uuid,
    pub action: CartAction,
    pub variation_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartItemRequest {
    pub product_id: Uuid,
}

/// A line item expanded with current product display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product: Uuid,
    pub title: String,
    pub price: Decimal,
    pub description: String,
    pub images: Vec<String>,
    pub category: String,
    pub quantity: i32,
    pub item_total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub status: bool,
    pub cart: Vec<CartLineView>,
    pub cart_total: Decimal,
    pub sub_total: Decimal,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            status: true,
            cart: vec![],
            cart_total: Decimal::ZERO,
            sub_total: Decimal::ZERO,
        }
    }
}
