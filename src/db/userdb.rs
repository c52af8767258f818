// db/userdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;

use crate::models::usermodel::{SystemLog, User, UserRole};

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        mobile: Option<(&str, &str)>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_admin_user(&self) -> Result<Option<User>, sqlx::Error>;

    async fn save_customer<T: Into<String> + Send>(
        &self,
        username: T,
        email: T,
        country_code: T,
        mobile: T,
        role: UserRole,
    ) -> Result<User, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn save_provider<T: Into<String> + Send>(
        &self,
        username: T,
        email: T,
        country_code: T,
        mobile: T,
        experience_year: i32,
        service_skill: T,
        service_km: i32,
        document_type: Option<String>,
        document_file: Option<String>,
    ) -> Result<User, sqlx::Error>;

    async fn set_user_otp(
        &self,
        user_id: Uuid,
        otp: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<User, sqlx::Error>;

    /// Clears the OTP and marks the account verified in one statement.
    async fn consume_user_otp(&self, user_id: Uuid) -> Result<User, sqlx::Error>;

    async fn approve_provider(&self, user_id: Uuid) -> Result<User, sqlx::Error>;

    async fn reject_provider(&self, user_id: Uuid, reason: &str) -> Result<User, sqlx::Error>;

    async fn get_providers_awaiting_review(&self) -> Result<Vec<User>, sqlx::Error>;

    async fn delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error>;

    async fn record_system_log(
        &self,
        log_type: &str,
        performed_by: Option<Uuid>,
        remark: &str,
    ) -> Result<SystemLog, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        mobile: Option<(&str, &str)>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, username, email, country_code, mobile, role,
                    profile_image, experience_year, service_skill, service_km,
                    document_type, document_file,
                    is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                    wallet_balance, is_blocked, blocked_reason,
                    otp, otp_created_at,
                    created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, username, email, country_code, mobile, role,
                    profile_image, experience_year, service_skill, service_km,
                    document_type, document_file,
                    is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                    wallet_balance, is_blocked, blocked_reason,
                    otp, otp_created_at,
                    created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some((country_code, mobile)) = mobile {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, username, email, country_code, mobile, role,
                    profile_image, experience_year, service_skill, service_km,
                    document_type, document_file,
                    is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                    wallet_balance, is_blocked, blocked_reason,
                    otp, otp_created_at,
                    created_at, updated_at
                FROM users
                WHERE country_code = $1 AND mobile = $2
                "#,
            )
            .bind(country_code)
            .bind(mobile)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_admin_user(&self) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, username, email, country_code, mobile, role,
                profile_image, experience_year, service_skill, service_km,
                document_type, document_file,
                is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                wallet_balance, is_blocked, blocked_reason,
                otp, otp_created_at,
                created_at, updated_at
            FROM users
            WHERE role = 'admin'::user_role
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_customer<T: Into<String> + Send>(
        &self,
        username: T,
        email: T,
        country_code: T,
        mobile: T,
        role: UserRole,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, country_code, mobile, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, username, email, country_code, mobile, role,
                profile_image, experience_year, service_skill, service_km,
                document_type, document_file,
                is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                wallet_balance, is_blocked, blocked_reason,
                otp, otp_created_at,
                created_at, updated_at
            "#,
        )
        .bind(username.into())
        .bind(email.into())
        .bind(country_code.into())
        .bind(mobile.into())
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }

    async fn save_provider<T: Into<String> + Send>(
        &self,
        username: T,
        email: T,
        country_code: T,
        mobile: T,
        experience_year: i32,
        service_skill: T,
        service_km: i32,
        document_type: Option<String>,
        document_file: Option<String>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                username, email, country_code, mobile, role,
                experience_year, service_skill, service_km,
                document_type, document_file
            )
            VALUES ($1, $2, $3, $4, 'service_provider'::user_role, $5, $6, $7, $8, $9)
            RETURNING
                id, username, email, country_code, mobile, role,
                profile_image, experience_year, service_skill, service_km,
                document_type, document_file,
                is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                wallet_balance, is_blocked, blocked_reason,
                otp, otp_created_at,
                created_at, updated_at
            "#,
        )
        .bind(username.into())
        .bind(email.into())
        .bind(country_code.into())
        .bind(mobile.into())
        .bind(experience_year)
        .bind(service_skill.into())
        .bind(service_km)
        .bind(document_type)
        .bind(document_file)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_user_otp(
        &self,
        user_id: Uuid,
        otp: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET otp = $2,
                otp_created_at = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, username, email, country_code, mobile, role,
                profile_image, experience_year, service_skill, service_km,
                document_type, document_file,
                is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                wallet_balance, is_blocked, blocked_reason,
                otp, otp_created_at,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(otp)
        .bind(issued_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn consume_user_otp(&self, user_id: Uuid) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET otp = NULL,
                otp_created_at = NULL,
                is_verified = TRUE,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, username, email, country_code, mobile, role,
                profile_image, experience_year, service_skill, service_km,
                document_type, document_file,
                is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                wallet_balance, is_blocked, blocked_reason,
                otp, otp_created_at,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn approve_provider(&self, user_id: Uuid) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_admin_verified = TRUE,
                is_verified = TRUE,
                is_blocked = FALSE,
                blocked_reason = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, username, email, country_code, mobile, role,
                profile_image, experience_year, service_skill, service_km,
                document_type, document_file,
                is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                wallet_balance, is_blocked, blocked_reason,
                otp, otp_created_at,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn reject_provider(&self, user_id: Uuid, reason: &str) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_admin_verified = FALSE,
                is_blocked = TRUE,
                blocked_reason = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, username, email, country_code, mobile, role,
                profile_image, experience_year, service_skill, service_km,
                document_type, document_file,
                is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                wallet_balance, is_blocked, blocked_reason,
                otp, otp_created_at,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(reason)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_providers_awaiting_review(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, username, email, country_code, mobile, role,
                profile_image, experience_year, service_skill, service_km,
                document_type, document_file,
                is_gov_verified, is_police_verified, is_admin_verified, is_verified,
                wallet_balance, is_blocked, blocked_reason,
                otp, otp_created_at,
                created_at, updated_at
            FROM users
            WHERE role = 'service_provider'::user_role
              AND is_admin_verified = FALSE
              AND is_blocked = FALSE
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn record_system_log(
        &self,
        log_type: &str,
        performed_by: Option<Uuid>,
        remark: &str,
    ) -> Result<SystemLog, sqlx::Error> {
        sqlx::query_as::<_, SystemLog>(
            r#"
            INSERT INTO system_logs (log_type, performed_by, remark)
            VALUES ($1, $2, $3)
            RETURNING id, log_type, performed_by, remark, created_at
            "#,
        )
        .bind(log_type)
        .bind(performed_by)
        .bind(remark)
        .fetch_one(&self.pool)
        .await
    }
}
