use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Cart {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct CartItem {
    pub id: uuid::Uuid,
    pub cart_id: uuid::Uuid,
    pub service_id: uuid::Uuid,
    pub quantity: i32,
    pub technician_count: i32,
    /// Unit price captured from the service at add time.
    pub price: f64,
    pub total: f64,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Line total; quantity and technician count both multiply the unit price.
    pub fn compute_total(quantity: i32, technician_count: i32, price: f64) -> f64 {
        quantity as f64 * technician_count as f64 * price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_multiplies_quantity_technicians_and_price() {
        assert_eq!(CartItem::compute_total(2, 3, 150.0), 900.0);
        assert_eq!(CartItem::compute_total(1, 1, 499.0), 499.0);
        assert_eq!(CartItem::compute_total(4, 1, 250.5), 1002.0);
    }
}
