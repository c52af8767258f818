use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::cartmodel::CartItem;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AddCartItemDto {
    pub service_id: Uuid,

    #[validate(range(min = 1, max = 50, message = "Quantity must be between 1-50"))]
    pub quantity: i32,

    #[validate(range(min = 1, max = 20, message = "Technician count must be between 1-20"))]
    pub technician_count: Option<i32>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemDto {
    #[validate(range(min = 1, max = 50, message = "Quantity must be between 1-50"))]
    pub quantity: Option<i32>,

    #[validate(range(min = 1, max = 20, message = "Technician count must be between 1-20"))]
    pub technician_count: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartData {
    pub cart_id: Option<Uuid>,
    pub items: Vec<CartItem>,
    pub total: f64,
}

impl CartData {
    /// An absent cart reads as empty, not as an error.
    pub fn empty() -> Self {
        CartData {
            cart_id: None,
            items: Vec::new(),
            total: 0.0,
        }
    }

    pub fn from_items(cart_id: Uuid, items: Vec<CartItem>) -> Self {
        let total = items.iter().map(|item| item.total).sum();
        CartData {
            cart_id: Some(cart_id),
            items,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(quantity: i32, technician_count: i32, price: f64) -> CartItem {
        let now = Utc::now();
        CartItem {
            id: Uuid::new_v4(),
            cart_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            quantity,
            technician_count,
            price,
            total: CartItem::compute_total(quantity, technician_count, price),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn cart_total_is_sum_of_line_totals() {
        let cart_id = Uuid::new_v4();
        let items = vec![item(2, 1, 300.0), item(1, 3, 150.0)];
        let expected: f64 = items.iter().map(|i| i.total).sum();

        let data = CartData::from_items(cart_id, items);
        assert_eq!(data.total, expected);
        assert_eq!(data.total, 1050.0);
    }

    #[test]
    fn empty_cart_reads_as_zero() {
        let data = CartData::empty();
        assert!(data.cart_id.is_none());
        assert!(data.items.is_empty());
        assert_eq!(data.total, 0.0);
    }
}
