// db/addressdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::usermodel::Address;
use crate::service::patch::AddressPatch;

#[async_trait]
pub trait AddressExt {
    async fn get_address(&self, address_id: Uuid) -> Result<Option<Address>, sqlx::Error>;

    async fn get_addresses(&self, user_id: Uuid) -> Result<Vec<Address>, sqlx::Error>;

    async fn get_default_address(&self, user_id: Uuid) -> Result<Option<Address>, sqlx::Error>;

    async fn save_address(
        &self,
        user_id: Uuid,
        label: &str,
        address: &str,
        city: &str,
        state: &str,
        pincode: &str,
        is_default: bool,
    ) -> Result<Address, sqlx::Error>;

    async fn update_address(
        &self,
        address_id: Uuid,
        patch: &AddressPatch,
    ) -> Result<Address, sqlx::Error>;

    async fn delete_address(&self, address_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl AddressExt for DBClient {
    async fn get_address(&self, address_id: Uuid) -> Result<Option<Address>, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            SELECT id, user_id, label, address, city, state, pincode, is_default,
                   created_at, updated_at
            FROM addresses
            WHERE id = $1
            "#,
        )
        .bind(address_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_addresses(&self, user_id: Uuid) -> Result<Vec<Address>, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            SELECT id, user_id, label, address, city, state, pincode, is_default,
                   created_at, updated_at
            FROM addresses
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_default_address(&self, user_id: Uuid) -> Result<Option<Address>, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            SELECT id, user_id, label, address, city, state, pincode, is_default,
                   created_at, updated_at
            FROM addresses
            WHERE user_id = $1 AND is_default = TRUE
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_address(
        &self,
        user_id: Uuid,
        label: &str,
        address: &str,
        city: &str,
        state: &str,
        pincode: &str,
        is_default: bool,
    ) -> Result<Address, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Newest default wins
        if is_default {
            sqlx::query("UPDATE addresses SET is_default = FALSE, updated_at = NOW() WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        let saved = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (user_id, label, address, city, state, pincode, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, label, address, city, state, pincode, is_default,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(label)
        .bind(address)
        .bind(city)
        .bind(state)
        .bind(pincode)
        .bind(is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn update_address(
        &self,
        address_id: Uuid,
        patch: &AddressPatch,
    ) -> Result<Address, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if patch.is_default == Some(true) {
            sqlx::query(
                r#"
                UPDATE addresses SET is_default = FALSE, updated_at = NOW()
                WHERE user_id = (SELECT user_id FROM addresses WHERE id = $1)
                "#,
            )
            .bind(address_id)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query_as::<_, Address>(
            r#"
            UPDATE addresses
            SET label = COALESCE($2, label),
                address = COALESCE($3, address),
                city = COALESCE($4, city),
                state = COALESCE($5, state),
                pincode = COALESCE($6, pincode),
                is_default = COALESCE($7, is_default),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, label, address, city, state, pincode, is_default,
                      created_at, updated_at
            "#,
        )
        .bind(address_id)
        .bind(patch.label.as_deref())
        .bind(patch.address.as_deref())
        .bind(patch.city.as_deref())
        .bind(patch.state.as_deref())
        .bind(patch.pincode.as_deref())
        .bind(patch.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_address(&self, address_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(address_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
