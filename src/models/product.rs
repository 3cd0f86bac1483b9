//! Product rows and request/response shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub size: String,
    pub color: String,
    pub unit: String,
    pub moq: i32,
    pub original_price: Decimal,
    pub discounted_price: Decimal,
    pub quantity: i32,
    pub sold: i32,
    pub images: Vec<String>,
    pub template_images: Vec<String>,
    pub status: String,
    pub is_in_cart: bool,
    pub is_in_wishlist: bool,
    pub average_rating: Decimal,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A priced paper/color/quantity configuration.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Variation {
    pub id: Uuid,
    pub product_id: Uuid,
    pub paper_size: String,
    pub paper_name: String,
    pub color: String,
    pub quantity_tier: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub moq: i32,
    #[serde(default)]
    pub original_price: Decimal,
    #[serde(default)]
    pub discounted_price: Decimal,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ProductVisibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductVisibility {
    Show,
    Hide,
}

impl ProductVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Show => "Show",
            Self::Hide => "Hide",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RateProductRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating should be between 1 and 5"))]
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariationRequest {
    #[serde(default)]
    pub paper_size: String,
    #[serde(default)]
    pub paper_name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_tier")]
    pub quantity_tier: i32,
    pub price: Decimal,
}

fn default_tier() -> i32 {
    1
}
