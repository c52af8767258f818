// db/pendingdb.rs
use async_trait::async_trait;
use sqlx::Error as SqlxError;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::pendingmodel::{PendingBankDetailUpdate, PendingProfileUpdate};
use crate::service::patch::{parse_bank_patch, parse_profile_patch};

pub const ERR_ALREADY_REVIEWED: &str = "already_reviewed";

#[async_trait]
pub trait PendingUpdateExt {
    async fn create_profile_update(
        &self,
        profile_id: Uuid,
        data: serde_json::Value,
    ) -> Result<PendingProfileUpdate, sqlx::Error>;

    async fn create_bank_update(
        &self,
        bank_detail_id: Uuid,
        data: serde_json::Value,
    ) -> Result<PendingBankDetailUpdate, sqlx::Error>;

    async fn get_unreviewed_profile_updates(
        &self,
    ) -> Result<Vec<PendingProfileUpdate>, sqlx::Error>;

    async fn get_unreviewed_bank_updates(
        &self,
    ) -> Result<Vec<PendingBankDetailUpdate>, sqlx::Error>;

    /// On approve, replays the stored patch through the field whitelist and
    /// stamps the entry reviewed. On reject, only the stamp happens. Either
    /// way a reviewed entry never comes back for review.
    async fn review_profile_update(
        &self,
        update_id: Uuid,
        reviewer_id: Uuid,
        approve: bool,
    ) -> Result<PendingProfileUpdate, sqlx::Error>;

    async fn review_bank_update(
        &self,
        update_id: Uuid,
        reviewer_id: Uuid,
        approve: bool,
    ) -> Result<PendingBankDetailUpdate, sqlx::Error>;
}

#[async_trait]
impl PendingUpdateExt for DBClient {
    async fn create_profile_update(
        &self,
        profile_id: Uuid,
        data: serde_json::Value,
    ) -> Result<PendingProfileUpdate, sqlx::Error> {
        sqlx::query_as::<_, PendingProfileUpdate>(
            r#"
            INSERT INTO pending_profile_updates (profile_id, data)
            VALUES ($1, $2)
            RETURNING id, profile_id, data, approved, reviewed, reviewed_by, reviewed_at, created_at
            "#,
        )
        .bind(profile_id)
        .bind(data)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_bank_update(
        &self,
        bank_detail_id: Uuid,
        data: serde_json::Value,
    ) -> Result<PendingBankDetailUpdate, sqlx::Error> {
        sqlx::query_as::<_, PendingBankDetailUpdate>(
            r#"
            INSERT INTO pending_bank_detail_updates (bank_detail_id, data)
            VALUES ($1, $2)
            RETURNING id, bank_detail_id, data, approved, reviewed, reviewed_by, reviewed_at, created_at
            "#,
        )
        .bind(bank_detail_id)
        .bind(data)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_unreviewed_profile_updates(
        &self,
    ) -> Result<Vec<PendingProfileUpdate>, sqlx::Error> {
        sqlx::query_as::<_, PendingProfileUpdate>(
            r#"
            SELECT id, profile_id, data, approved, reviewed, reviewed_by, reviewed_at, created_at
            FROM pending_profile_updates
            WHERE NOT reviewed
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_unreviewed_bank_updates(
        &self,
    ) -> Result<Vec<PendingBankDetailUpdate>, sqlx::Error> {
        sqlx::query_as::<_, PendingBankDetailUpdate>(
            r#"
            SELECT id, bank_detail_id, data, approved, reviewed, reviewed_by, reviewed_at, created_at
            FROM pending_bank_detail_updates
            WHERE NOT reviewed
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn review_profile_update(
        &self,
        update_id: Uuid,
        reviewer_id: Uuid,
        approve: bool,
    ) -> Result<PendingProfileUpdate, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let entry = sqlx::query_as::<_, PendingProfileUpdate>(
            r#"
            SELECT id, profile_id, data, approved, reviewed, reviewed_by, reviewed_at, created_at
            FROM pending_profile_updates
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(update_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SqlxError::RowNotFound)?;

        if entry.reviewed {
            return Err(SqlxError::Protocol(ERR_ALREADY_REVIEWED.into()));
        }

        if approve {
            let patch = parse_profile_patch(&entry.data);

            if patch.touches_profile() {
                sqlx::query(
                    r#"
                    UPDATE users
                    SET profile_image = COALESCE($2, profile_image),
                        experience_year = COALESCE($3, experience_year),
                        service_skill = COALESCE($4, service_skill),
                        service_km = COALESCE($5, service_km),
                        document_type = COALESCE($6, document_type),
                        document_file = COALESCE($7, document_file),
                        updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(entry.profile_id)
                .bind(patch.profile_image.as_deref())
                .bind(patch.experience_year)
                .bind(patch.service_skill.as_deref())
                .bind(patch.service_km)
                .bind(patch.document_type.as_deref())
                .bind(patch.document_file.as_deref())
                .execute(&mut *tx)
                .await?;
            }

            for addr in &patch.addresses {
                if addr.is_default == Some(true) {
                    sqlx::query(
                        "UPDATE addresses SET is_default = FALSE, updated_at = NOW() WHERE user_id = $1",
                    )
                    .bind(entry.profile_id)
                    .execute(&mut *tx)
                    .await?;
                }

                match addr.id {
                    Some(address_id) => {
                        // The id must belong to the profile under review.
                        let result = sqlx::query(
                            r#"
                            UPDATE addresses
                            SET label = COALESCE($3, label),
                                address = COALESCE($4, address),
                                city = COALESCE($5, city),
                                state = COALESCE($6, state),
                                pincode = COALESCE($7, pincode),
                                is_default = COALESCE($8, is_default),
                                updated_at = NOW()
                            WHERE id = $1 AND user_id = $2
                            "#,
                        )
                        .bind(address_id)
                        .bind(entry.profile_id)
                        .bind(addr.label.as_deref())
                        .bind(addr.address.as_deref())
                        .bind(addr.city.as_deref())
                        .bind(addr.state.as_deref())
                        .bind(addr.pincode.as_deref())
                        .bind(addr.is_default)
                        .execute(&mut *tx)
                        .await?;

                        if result.rows_affected() == 0 {
                            return Err(SqlxError::RowNotFound);
                        }
                    }
                    None => {
                        sqlx::query(
                            r#"
                            INSERT INTO addresses (user_id, label, address, city, state, pincode, is_default)
                            VALUES ($1, $2, $3, $4, $5, $6, $7)
                            "#,
                        )
                        .bind(entry.profile_id)
                        .bind(addr.label.as_deref().unwrap_or("home"))
                        .bind(addr.address.as_deref().unwrap_or_default())
                        .bind(addr.city.as_deref().unwrap_or_default())
                        .bind(addr.state.as_deref().unwrap_or_default())
                        .bind(addr.pincode.as_deref().unwrap_or_default())
                        .bind(addr.is_default.unwrap_or(false))
                        .execute(&mut *tx)
                        .await?;
                    }
                }
            }
        }

        let reviewed = sqlx::query_as::<_, PendingProfileUpdate>(
            r#"
            UPDATE pending_profile_updates
            SET approved = $2,
                reviewed = TRUE,
                reviewed_by = $3,
                reviewed_at = NOW()
            WHERE id = $1
            RETURNING id, profile_id, data, approved, reviewed, reviewed_by, reviewed_at, created_at
            "#,
        )
        .bind(update_id)
        .bind(approve)
        .bind(reviewer_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reviewed)
    }

    async fn review_bank_update(
        &self,
        update_id: Uuid,
        reviewer_id: Uuid,
        approve: bool,
    ) -> Result<PendingBankDetailUpdate, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let entry = sqlx::query_as::<_, PendingBankDetailUpdate>(
            r#"
            SELECT id, bank_detail_id, data, approved, reviewed, reviewed_by, reviewed_at, created_at
            FROM pending_bank_detail_updates
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(update_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SqlxError::RowNotFound)?;

        if entry.reviewed {
            return Err(SqlxError::Protocol(ERR_ALREADY_REVIEWED.into()));
        }

        if approve {
            let patch = parse_bank_patch(&entry.data);

            if !patch.is_empty() {
                sqlx::query(
                    r#"
                    UPDATE bank_details
                    SET account_holder_name = COALESCE($2, account_holder_name),
                        account_number = COALESCE($3, account_number),
                        ifsc_code = COALESCE($4, ifsc_code),
                        bank_name = COALESCE($5, bank_name),
                        upi_id = COALESCE($6, upi_id),
                        updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(entry.bank_detail_id)
                .bind(patch.account_holder_name.as_deref())
                .bind(patch.account_number.as_deref())
                .bind(patch.ifsc_code.as_deref())
                .bind(patch.bank_name.as_deref())
                .bind(patch.upi_id.as_deref())
                .execute(&mut *tx)
                .await?;
            }
        }

        let reviewed = sqlx::query_as::<_, PendingBankDetailUpdate>(
            r#"
            UPDATE pending_bank_detail_updates
            SET approved = $2,
                reviewed = TRUE,
                reviewed_by = $3,
                reviewed_at = NOW()
            WHERE id = $1
            RETURNING id, bank_detail_id, data, approved, reviewed, reviewed_by, reviewed_at, created_at
            "#,
        )
        .bind(update_id)
        .bind(approve)
        .bind(reviewer_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reviewed)
    }
}
