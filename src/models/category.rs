//! Category rows and request shapes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub parent: String,
    pub slug: String,
    pub cat_type: String,
    pub icon: String,
    pub children: serde_json::Value,
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub parent: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, rename = "type")]
    pub cat_type: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "empty_children")]
    pub children: serde_json::Value,
}

fn empty_children() -> serde_json::Value {
    serde_json::Value::Array(vec![])
}
