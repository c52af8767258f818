use chrono::prelude::*;
use serde::{Deserialize, Serialize};

/// Seconds an issued OTP stays valid, for both login and service-start codes.
pub const OTP_VALIDITY_SECS: i64 = 600;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    ServiceProvider,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Customer => "customer",
            UserRole::ServiceProvider => "service_provider",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: String,
    pub country_code: String,
    pub mobile: String,
    pub role: UserRole,
    pub profile_image: Option<String>,

    // Provider fields, NULL for customers
    pub experience_year: Option<i32>,
    pub service_skill: Option<String>,
    pub service_km: Option<i32>,
    pub document_type: Option<String>,
    pub document_file: Option<String>,

    pub is_gov_verified: bool,
    pub is_police_verified: bool,
    pub is_admin_verified: bool,
    pub is_verified: bool,
    pub wallet_balance: f64,
    pub is_blocked: bool,
    pub blocked_reason: Option<String>,

    // Never serialized; codes leave the system out of band only
    #[serde(skip_serializing, default)]
    pub otp: Option<String>,
    #[serde(skip_serializing, default)]
    pub otp_created_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True while the stored OTP is at most OTP_VALIDITY_SECS old.
    pub fn is_otp_valid(&self, now: DateTime<Utc>) -> bool {
        match self.otp_created_at {
            Some(created) => {
                let age = (now - created).num_seconds();
                (0..=OTP_VALIDITY_SECS).contains(&age)
            }
            None => false,
        }
    }

    pub fn otp_matches(&self, entered: &str) -> bool {
        self.otp.as_deref() == Some(entered)
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Address {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub label: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub is_default: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct BankDetail {
    pub id: uuid::Uuid,
    pub customer_id: uuid::Uuid,
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub upi_id: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct SystemLog {
    pub id: uuid::Uuid,
    pub log_type: String,
    pub performed_by: Option<uuid::Uuid>,
    pub remark: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_with_otp(code: &str, issued: DateTime<Utc>) -> User {
        User {
            id: uuid::Uuid::new_v4(),
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            country_code: "+91".to_string(),
            mobile: "9876543210".to_string(),
            role: UserRole::Customer,
            profile_image: None,
            experience_year: None,
            service_skill: None,
            service_km: None,
            document_type: None,
            document_file: None,
            is_gov_verified: false,
            is_police_verified: false,
            is_admin_verified: false,
            is_verified: false,
            wallet_balance: 0.0,
            is_blocked: false,
            blocked_reason: None,
            otp: Some(code.to_string()),
            otp_created_at: Some(issued),
            created_at: issued,
            updated_at: issued,
        }
    }

    #[test]
    fn otp_valid_within_window() {
        let now = Utc::now();
        let user = user_with_otp("123456", now - Duration::seconds(599));
        assert!(user.is_otp_valid(now));
    }

    #[test]
    fn otp_valid_at_exact_boundary() {
        let now = Utc::now();
        let user = user_with_otp("123456", now - Duration::seconds(OTP_VALIDITY_SECS));
        assert!(user.is_otp_valid(now));
    }

    #[test]
    fn otp_expired_past_window() {
        let now = Utc::now();
        let user = user_with_otp("123456", now - Duration::seconds(OTP_VALIDITY_SECS + 1));
        assert!(!user.is_otp_valid(now));
    }

    #[test]
    fn otp_invalid_when_never_issued() {
        let now = Utc::now();
        let mut user = user_with_otp("123456", now);
        user.otp = None;
        user.otp_created_at = None;
        assert!(!user.is_otp_valid(now));
        assert!(!user.otp_matches("123456"));
    }

    #[test]
    fn otp_comparison_is_exact() {
        let now = Utc::now();
        let user = user_with_otp("123456", now);
        assert!(user.otp_matches("123456"));
        assert!(!user.otp_matches("654321"));
        assert!(!user.otp_matches("12345"));
    }

    #[test]
    fn otp_never_serialized() {
        let now = Utc::now();
        let user = user_with_otp("123456", now);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("123456"));
        assert!(!json.contains("otp"));
    }

    #[test]
    fn role_to_str() {
        assert_eq!(UserRole::Customer.to_str(), "customer");
        assert_eq!(UserRole::ServiceProvider.to_str(), "service_provider");
        assert_eq!(UserRole::Admin.to_str(), "admin");
    }
}
