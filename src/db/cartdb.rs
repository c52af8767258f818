// db/cartdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::cartmodel::{Cart, CartItem};

#[async_trait]
pub trait CartExt {
    async fn get_cart(&self, user_id: Uuid) -> Result<Option<Cart>, sqlx::Error>;

    async fn get_or_create_cart(&self, user_id: Uuid) -> Result<Cart, sqlx::Error>;

    async fn get_cart_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>, sqlx::Error>;

    async fn get_cart_item(&self, item_id: Uuid) -> Result<Option<CartItem>, sqlx::Error>;

    /// Inserts the line or, when the service is already in the cart,
    /// replaces quantity and technician count. Total is recomputed either way.
    async fn upsert_cart_item(
        &self,
        cart_id: Uuid,
        service_id: Uuid,
        quantity: i32,
        technician_count: i32,
        price: f64,
    ) -> Result<CartItem, sqlx::Error>;

    async fn update_cart_item(
        &self,
        item_id: Uuid,
        quantity: Option<i32>,
        technician_count: Option<i32>,
    ) -> Result<CartItem, sqlx::Error>;

    async fn delete_cart_item(&self, item_id: Uuid) -> Result<(), sqlx::Error>;

    async fn clear_cart(&self, cart_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl CartExt for DBClient {
    async fn get_cart(&self, user_id: Uuid) -> Result<Option<Cart>, sqlx::Error> {
        sqlx::query_as::<_, Cart>(
            r#"
            SELECT id, user_id, created_at, updated_at
            FROM carts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_or_create_cart(&self, user_id: Uuid) -> Result<Cart, sqlx::Error> {
        sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET updated_at = NOW()
            RETURNING id, user_id, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_cart_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>, sqlx::Error> {
        sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, service_id, quantity, technician_count, price, total,
                   created_at, updated_at
            FROM cart_items
            WHERE cart_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_cart_item(&self, item_id: Uuid) -> Result<Option<CartItem>, sqlx::Error> {
        sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, service_id, quantity, technician_count, price, total,
                   created_at, updated_at
            FROM cart_items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_cart_item(
        &self,
        cart_id: Uuid,
        service_id: Uuid,
        quantity: i32,
        technician_count: i32,
        price: f64,
    ) -> Result<CartItem, sqlx::Error> {
        let total = CartItem::compute_total(quantity, technician_count, price);

        sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (cart_id, service_id, quantity, technician_count, price, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (cart_id, service_id) DO UPDATE
            SET quantity = EXCLUDED.quantity,
                technician_count = EXCLUDED.technician_count,
                price = EXCLUDED.price,
                total = EXCLUDED.total,
                updated_at = NOW()
            RETURNING id, cart_id, service_id, quantity, technician_count, price, total,
                      created_at, updated_at
            "#,
        )
        .bind(cart_id)
        .bind(service_id)
        .bind(quantity)
        .bind(technician_count)
        .bind(price)
        .bind(total)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_cart_item(
        &self,
        item_id: Uuid,
        quantity: Option<i32>,
        technician_count: Option<i32>,
    ) -> Result<CartItem, sqlx::Error> {
        sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
            SET quantity = COALESCE($2, quantity),
                technician_count = COALESCE($3, technician_count),
                total = COALESCE($2, quantity)::float8
                        * COALESCE($3, technician_count)::float8
                        * price,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, cart_id, service_id, quantity, technician_count, price, total,
                      created_at, updated_at
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .bind(technician_count)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_cart_item(&self, item_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn clear_cart(&self, cart_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
