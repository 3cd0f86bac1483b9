//! Coupon rows and request shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Coupon {
    pub id: Uuid,
    pub title: String,
    pub logo: Option<String>,
    pub coupon_code: String,
    pub end_time: Option<DateTime<Utc>>,
    pub discount_percentage: Decimal,
    pub minimum_amount: Decimal,
    pub product_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRequest {
    pub title: String,
    pub logo: Option<String>,
    pub coupon_code: String,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub minimum_amount: Decimal,
    pub product_type: Option<String>,
}
