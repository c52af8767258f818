// db/paymentdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error as SqlxError;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::{
    bookingmodel::Booking,
    paymentmodel::{Payment, PaymentStatus},
};

/// Everything needed to turn one cart line into a booking row.
#[derive(Debug, Clone)]
pub struct BookingSeed {
    pub service_id: Uuid,
    pub technician_required: i32,
    pub technician: Option<Uuid>,
}

#[async_trait]
pub trait PaymentExt {
    async fn get_payment_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error>;

    async fn get_payments_for_user(&self, user_id: Uuid) -> Result<Vec<Payment>, sqlx::Error>;

    /// The checkout write set: one payment, one booking per seed, cart lines
    /// removed, anchor consumed. Commits or rolls back as a unit.
    #[allow(clippy::too_many_arguments)]
    async fn record_checkout(
        &self,
        user_id: Uuid,
        anchor: &Booking,
        cart_id: Uuid,
        seeds: &[BookingSeed],
        order_id: &str,
        amount: f64,
        currency: &str,
        scheduled_datetime: Option<DateTime<Utc>>,
    ) -> Result<(Payment, Vec<Booking>), sqlx::Error>;

    /// Settles the payment and bills every booking it covers. A payment
    /// already in `success` is returned untouched.
    async fn mark_payment_success(
        &self,
        order_id: &str,
        provider_payment_id: &str,
        payment_method: Option<&str>,
        receipt: Option<&str>,
    ) -> Result<Payment, sqlx::Error>;
}

#[async_trait]
impl PaymentExt for DBClient {
    async fn get_payment_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, user_id, order_id, amount, currency, status,
                   provider_payment_id, payment_method, receipt,
                   created_at, updated_at
            FROM payments
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_payments_for_user(&self, user_id: Uuid) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, user_id, order_id, amount, currency, status,
                   provider_payment_id, payment_method, receipt,
                   created_at, updated_at
            FROM payments
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn record_checkout(
        &self,
        user_id: Uuid,
        anchor: &Booking,
        cart_id: Uuid,
        seeds: &[BookingSeed],
        order_id: &str,
        amount: f64,
        currency: &str,
        scheduled_datetime: Option<DateTime<Utc>>,
    ) -> Result<(Payment, Vec<Booking>), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (user_id, order_id, amount, currency)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, order_id, amount, currency, status,
                      provider_payment_id, payment_method, receipt,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(order_id)
        .bind(amount)
        .bind(currency)
        .fetch_one(&mut *tx)
        .await?;

        let mut bookings = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let status = if seed.technician.is_some() {
                "assign"
            } else {
                "pending"
            };

            let booking = sqlx::query_as::<_, Booking>(
                r#"
                INSERT INTO bookings (
                    user_id, service_id, status, technician_required, assigned_technician,
                    is_scheduled, scheduled_datetime,
                    service_start_otp, otp_generated_at,
                    payment_id
                )
                VALUES ($1, $2, $3::booking_status, $4, $5, $6, $7, $8, $9, $10)
                RETURNING
                    id, user_id, service_id, status, technician_required, assigned_technician,
                    manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                    is_scheduled, scheduled_datetime,
                    service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                    quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                    created_at, updated_at
                "#,
            )
            .bind(user_id)
            .bind(seed.service_id)
            .bind(status)
            .bind(seed.technician_required)
            .bind(seed.technician)
            .bind(scheduled_datetime.is_some())
            .bind(scheduled_datetime)
            .bind(anchor.service_start_otp.as_deref())
            .bind(anchor.otp_generated_at)
            .bind(payment.id)
            .fetch_one(&mut *tx)
            .await?;

            bookings.push(booking);
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(anchor.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((payment, bookings))
    }

    async fn mark_payment_success(
        &self,
        order_id: &str,
        provider_payment_id: &str,
        payment_method: Option<&str>,
        receipt: Option<&str>,
    ) -> Result<Payment, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, user_id, order_id, amount, currency, status,
                   provider_payment_id, payment_method, receipt,
                   created_at, updated_at
            FROM payments
            WHERE order_id = $1
            FOR UPDATE
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SqlxError::RowNotFound)?;

        if payment.status == PaymentStatus::Success {
            tx.commit().await?;
            return Ok(payment);
        }

        let updated = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = 'success'::payment_status,
                provider_payment_id = $2,
                payment_method = COALESCE($3, payment_method),
                receipt = COALESCE($4, receipt),
                updated_at = NOW()
            WHERE order_id = $1
            RETURNING id, user_id, order_id, amount, currency, status,
                      provider_payment_id, payment_method, receipt,
                      created_at, updated_at
            "#,
        )
        .bind(order_id)
        .bind(provider_payment_id)
        .bind(payment_method)
        .bind(receipt)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE bookings
            SET is_billed = TRUE,
                updated_at = NOW()
            WHERE payment_id = $1
            "#,
        )
        .bind(updated.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }
}
