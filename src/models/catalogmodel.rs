use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Category {
    pub id: uuid::Uuid,
    pub category_name: String,
    pub image: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A bookable service. Kept under the legacy "subcategory" table name.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct SubCategory {
    pub id: uuid::Uuid,
    pub category_id: uuid::Uuid,
    pub name: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub image: Option<String>,
    pub section: String,
    pub steps: String,
    pub faqs: String,
    pub price: f64,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
