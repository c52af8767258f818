// db/bookingdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error as SqlxError;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::bookingmodel::{Booking, BookingStatus};

pub const ERR_INVALID_TRANSITION: &str = "invalid_transition";

#[async_trait]
pub trait BookingExt {
    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error>;

    /// Bookings the customer created. Anchor rows are not listed.
    async fn get_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, sqlx::Error>;

    async fn get_bookings_for_technician(
        &self,
        technician_id: Uuid,
    ) -> Result<Vec<Booking>, sqlx::Error>;

    async fn get_all_bookings(&self, page: u32, limit: usize) -> Result<Vec<Booking>, sqlx::Error>;

    /// Replaces any live anchor for the user with a fresh one carrying the
    /// new OTP, so at most one checkout code is valid at a time.
    async fn refresh_anchor_booking(
        &self,
        user_id: Uuid,
        otp: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<Booking, sqlx::Error>;

    /// Compare-and-set: stamps verification only if the stored code still
    /// equals `entered`. Returns None when an overlapping write won.
    async fn stamp_otp_verified(
        &self,
        booking_id: Uuid,
        verifier_id: Uuid,
        entered: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, sqlx::Error>;

    async fn assign_technician(
        &self,
        booking_id: Uuid,
        technician_id: Uuid,
        assigned_by: Uuid,
        reason: &str,
    ) -> Result<Booking, sqlx::Error>;

    async fn mark_arriving(&self, booking_id: Uuid) -> Result<Booking, sqlx::Error>;

    /// Completes the booking and, when a quotation was recorded, credits the
    /// assigned technician's wallet in the same transaction.
    async fn complete_booking(
        &self,
        booking_id: Uuid,
        quotation_amount: Option<f64>,
        complete_photo: Option<&str>,
        complete_comment: Option<&str>,
    ) -> Result<Booking, sqlx::Error>;

    async fn cancel_booking(&self, booking_id: Uuid) -> Result<Booking, sqlx::Error>;

    async fn schedule_booking(
        &self,
        booking_id: Uuid,
        scheduled_datetime: DateTime<Utc>,
    ) -> Result<Option<Booking>, sqlx::Error>;
}

#[async_trait]
impl BookingExt for DBClient {
    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            FROM bookings
            WHERE user_id = $1 AND service_id IS NOT NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_bookings_for_technician(
        &self,
        technician_id: Uuid,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            FROM bookings
            WHERE assigned_technician = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(technician_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_all_bookings(&self, page: u32, limit: usize) -> Result<Vec<Booking>, sqlx::Error> {
        let offset = (page.saturating_sub(1) as i64) * limit as i64;

        sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            FROM bookings
            WHERE service_id IS NOT NULL
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn refresh_anchor_booking(
        &self,
        user_id: Uuid,
        otp: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<Booking, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM bookings
            WHERE user_id = $1 AND service_id IS NULL AND otp_verified_at IS NULL
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let anchor = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (user_id, service_id, service_start_otp, otp_generated_at)
            VALUES ($1, NULL, $2, $3)
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
        .bind(otp)
        .bind(issued_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(anchor)
    }

    async fn stamp_otp_verified(
        &self,
        booking_id: Uuid,
        verifier_id: Uuid,
        entered: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET otp_verified_at = $4,
                otp_verified_by = $2,
                service_start_otp = NULL,
                updated_at = NOW()
            WHERE id = $1 AND service_start_otp = $3
            RETURNING
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .bind(verifier_id)
        .bind(entered)
        .bind(verified_at)
        .fetch_optional(&self.pool)
        .await
    }

    async fn assign_technician(
        &self,
        booking_id: Uuid,
        technician_id: Uuid,
        assigned_by: Uuid,
        reason: &str,
    ) -> Result<Booking, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SqlxError::RowNotFound)?;

        if !booking.can_transition_to(BookingStatus::Assign) {
            return Err(SqlxError::Protocol(ERR_INVALID_TRANSITION.into()));
        }

        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET assigned_technician = $2,
                status = 'assign'::booking_status,
                manual_assigned_by = $3,
                manual_assigned_reason = $4,
                manual_assigned_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .bind(technician_id)
        .bind(assigned_by)
        .bind(reason)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn mark_arriving(&self, booking_id: Uuid) -> Result<Booking, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SqlxError::RowNotFound)?;

        if !booking.can_transition_to(BookingStatus::Arriving) {
            return Err(SqlxError::Protocol(ERR_INVALID_TRANSITION.into()));
        }

        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'arriving'::booking_status,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn complete_booking(
        &self,
        booking_id: Uuid,
        quotation_amount: Option<f64>,
        complete_photo: Option<&str>,
        complete_comment: Option<&str>,
    ) -> Result<Booking, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SqlxError::RowNotFound)?;

        if !booking.can_transition_to(BookingStatus::Complete) {
            return Err(SqlxError::Protocol(ERR_INVALID_TRANSITION.into()));
        }

        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'complete'::booking_status,
                quotation_amount = COALESCE($2, quotation_amount),
                complete_photo = COALESCE($3, complete_photo),
                complete_comment = COALESCE($4, complete_comment),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .bind(quotation_amount)
        .bind(complete_photo)
        .bind(complete_comment)
        .fetch_one(&mut *tx)
        .await?;

        if let (Some(amount), Some(technician_id)) =
            (updated.quotation_amount, updated.assigned_technician)
        {
            sqlx::query(
                r#"
                UPDATE users
                SET wallet_balance = wallet_balance + $2,
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(technician_id)
            .bind(amount)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO system_logs (log_type, performed_by, remark)
                VALUES ('wallet_update', $1, $2)
                "#,
            )
            .bind(technician_id)
            .bind(format!(
                "Wallet credited {:.2} for booking {}",
                amount, booking_id
            ))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(updated)
    }

    async fn cancel_booking(&self, booking_id: Uuid) -> Result<Booking, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SqlxError::RowNotFound)?;

        if !booking.can_transition_to(BookingStatus::Cancel) {
            return Err(SqlxError::Protocol(ERR_INVALID_TRANSITION.into()));
        }

        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'cancel'::booking_status,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn schedule_booking(
        &self,
        booking_id: Uuid,
        scheduled_datetime: DateTime<Utc>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET is_scheduled = TRUE,
                scheduled_datetime = $2,
                updated_at = NOW()
            WHERE id = $1 AND status NOT IN ('complete'::booking_status, 'cancel'::booking_status)
            RETURNING
                id, user_id, service_id, status, technician_required, assigned_technician,
                manual_assigned_by, manual_assigned_reason, manual_assigned_at,
                is_scheduled, scheduled_datetime,
                service_start_otp, otp_generated_at, otp_verified_at, otp_verified_by,
                quotation_amount, complete_photo, complete_comment, is_billed, payment_id,
                created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .bind(scheduled_datetime)
        .fetch_optional(&self.pool)
        .await
    }
}
