// db/bankdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::usermodel::BankDetail;

#[async_trait]
pub trait BankDetailExt {
    async fn get_bank_detail(&self, bank_detail_id: Uuid)
        -> Result<Option<BankDetail>, sqlx::Error>;

    async fn get_bank_details(&self, customer_id: Uuid) -> Result<Vec<BankDetail>, sqlx::Error>;

    async fn save_bank_detail(
        &self,
        customer_id: Uuid,
        account_holder_name: &str,
        account_number: &str,
        ifsc_code: &str,
        bank_name: &str,
        upi_id: Option<&str>,
    ) -> Result<BankDetail, sqlx::Error>;

    async fn delete_bank_detail(&self, bank_detail_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl BankDetailExt for DBClient {
    async fn get_bank_detail(
        &self,
        bank_detail_id: Uuid,
    ) -> Result<Option<BankDetail>, sqlx::Error> {
        sqlx::query_as::<_, BankDetail>(
            r#"
            SELECT id, customer_id, account_holder_name, account_number, ifsc_code,
                   bank_name, upi_id, created_at, updated_at
            FROM bank_details
            WHERE id = $1
            "#,
        )
        .bind(bank_detail_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_bank_details(&self, customer_id: Uuid) -> Result<Vec<BankDetail>, sqlx::Error> {
        sqlx::query_as::<_, BankDetail>(
            r#"
            SELECT id, customer_id, account_holder_name, account_number, ifsc_code,
                   bank_name, upi_id, created_at, updated_at
            FROM bank_details
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_bank_detail(
        &self,
        customer_id: Uuid,
        account_holder_name: &str,
        account_number: &str,
        ifsc_code: &str,
        bank_name: &str,
        upi_id: Option<&str>,
    ) -> Result<BankDetail, sqlx::Error> {
        sqlx::query_as::<_, BankDetail>(
            r#"
            INSERT INTO bank_details (
                customer_id, account_holder_name, account_number, ifsc_code, bank_name, upi_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, customer_id, account_holder_name, account_number, ifsc_code,
                      bank_name, upi_id, created_at, updated_at
            "#,
        )
        .bind(customer_id)
        .bind(account_holder_name)
        .bind(account_number)
        .bind(ifsc_code)
        .bind(bank_name)
        .bind(upi_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_bank_detail(&self, bank_detail_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM bank_details WHERE id = $1")
            .bind(bank_detail_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
