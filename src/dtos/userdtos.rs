use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::usermodel::{User, UserRole};
use crate::service::patch::AddressPatch;

fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    let mobile_regex =
        regex::Regex::new(r"^[0-9]{10}$").map_err(|_| ValidationError::new("invalid_regex"))?;

    if !mobile_regex.is_match(mobile) {
        let mut error = ValidationError::new("invalid_mobile");
        error.message = Some("Mobile number must be exactly 10 digits".into());
        return Err(error);
    }
    Ok(())
}

fn validate_country_code(code: &str) -> Result<(), ValidationError> {
    let code_regex =
        regex::Regex::new(r"^\+[0-9]{1,4}$").map_err(|_| ValidationError::new("invalid_regex"))?;

    if !code_regex.is_match(code) {
        let mut error = ValidationError::new("invalid_country_code");
        error.message = Some("Country code must look like +91".into());
        return Err(error);
    }
    Ok(())
}

// Provider accounts go through their own registration route.
fn validate_registration_role(role: &UserRole) -> Result<(), ValidationError> {
    match role {
        UserRole::Customer | UserRole::Admin => Ok(()),
        UserRole::ServiceProvider => {
            let mut error = ValidationError::new("invalid_role");
            error.message =
                Some("Use the provider registration endpoint for service provider accounts".into());
            Err(error)
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 2, max = 150, message = "Username must be between 2-150 characters"))]
    pub username: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(custom = "validate_country_code")]
    pub country_code: String,

    #[validate(custom = "validate_mobile")]
    pub mobile: String,

    #[validate(custom = "validate_registration_role")]
    pub role: Option<UserRole>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterProviderDto {
    #[validate(length(min = 2, max = 150, message = "Username must be between 2-150 characters"))]
    pub username: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(custom = "validate_country_code")]
    pub country_code: String,

    #[validate(custom = "validate_mobile")]
    pub mobile: String,

    #[validate(range(min = 0, max = 60, message = "Experience must be between 0-60 years"))]
    pub experience_year: Option<i32>,

    #[validate(length(min = 2, max = 255, message = "Service skill must be between 2-255 characters"))]
    pub service_skill: Option<String>,

    #[validate(range(min = 1, max = 500, message = "Service radius must be between 1-500 km"))]
    pub service_km: Option<i32>,

    pub document_type: Option<String>,
    pub document_file: Option<String>,
}

impl RegisterProviderDto {
    /// Derive validation skips absent Options; providers must supply these.
    pub fn validate_provider_fields(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.experience_year.is_none() {
            let mut error = ValidationError::new("required");
            error.message = Some("Experience year is required for providers".into());
            errors.add("experience_year", error);
        }
        if self.service_skill.is_none() {
            let mut error = ValidationError::new("required");
            error.message = Some("Service skill is required for providers".into());
            errors.add("service_skill", error);
        }
        if self.service_km.is_none() {
            let mut error = ValidationError::new("required");
            error.message = Some("Service radius is required for providers".into());
            errors.add("service_km", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct MobileLoginDto {
    #[validate(custom = "validate_country_code")]
    pub country_code: String,

    #[validate(custom = "validate_mobile")]
    pub mobile: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct VerifyOtpDto {
    #[validate(custom = "validate_country_code")]
    pub country_code: String,

    #[validate(custom = "validate_mobile")]
    pub mobile: String,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub country_code: String,
    pub mobile: String,
    pub role: String,
    pub profile_image: Option<String>,
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
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            username: user.username.to_owned(),
            email: user.email.to_owned(),
            country_code: user.country_code.to_owned(),
            mobile: user.mobile.to_owned(),
            role: user.role.to_str().to_string(),
            profile_image: user.profile_image.clone(),
            experience_year: user.experience_year,
            service_skill: user.service_skill.clone(),
            service_km: user.service_km,
            document_type: user.document_type.clone(),
            document_file: user.document_file.clone(),
            is_gov_verified: user.is_gov_verified,
            is_police_verified: user.is_police_verified,
            is_admin_verified: user.is_admin_verified,
            is_verified: user.is_verified,
            wallet_balance: user.wallet_balance,
            is_blocked: user.is_blocked,
            blocked_reason: user.blocked_reason.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: FilterUserDto,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AddressDto {
    #[validate(length(min = 1, max = 50, message = "Label must be between 1-50 characters"))]
    pub label: Option<String>,

    #[validate(length(min = 3, max = 255, message = "Address must be between 3-255 characters"))]
    pub address: String,

    #[validate(length(min = 2, max = 50, message = "City must be between 2-50 characters"))]
    pub city: String,

    #[validate(length(min = 2, max = 50, message = "State must be between 2-50 characters"))]
    pub state: String,

    #[validate(length(min = 4, max = 10, message = "Pincode must be between 4-10 characters"))]
    pub pincode: String,

    pub is_default: Option<bool>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateAddressDto {
    #[validate(length(min = 1, max = 50, message = "Label must be between 1-50 characters"))]
    pub label: Option<String>,

    #[validate(length(min = 3, max = 255, message = "Address must be between 3-255 characters"))]
    pub address: Option<String>,

    #[validate(length(min = 2, max = 50, message = "City must be between 2-50 characters"))]
    pub city: Option<String>,

    #[validate(length(min = 2, max = 50, message = "State must be between 2-50 characters"))]
    pub state: Option<String>,

    #[validate(length(min = 4, max = 10, message = "Pincode must be between 4-10 characters"))]
    pub pincode: Option<String>,

    pub is_default: Option<bool>,
}

impl UpdateAddressDto {
    pub fn into_patch(self) -> AddressPatch {
        AddressPatch {
            id: None,
            label: self.label,
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            is_default: self.is_default,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct BankDetailDto {
    #[validate(length(min = 2, max = 150, message = "Account holder name must be between 2-150 characters"))]
    pub account_holder_name: String,

    #[validate(length(min = 5, max = 30, message = "Account number must be between 5-30 characters"))]
    pub account_number: String,

    #[validate(length(min = 5, max = 20, message = "IFSC code must be between 5-20 characters"))]
    pub ifsc_code: String,

    #[validate(length(min = 2, max = 100, message = "Bank name must be between 2-100 characters"))]
    pub bank_name: String,

    pub upi_id: Option<String>,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_provider_role() {
        let dto = RegisterUserDto {
            username: "ravi".to_string(),
            email: "ravi@example.com".to_string(),
            country_code: "+91".to_string(),
            mobile: "9876543210".to_string(),
            role: Some(UserRole::ServiceProvider),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_accepts_customer_role_and_none() {
        let mut dto = RegisterUserDto {
            username: "ravi".to_string(),
            email: "ravi@example.com".to_string(),
            country_code: "+91".to_string(),
            mobile: "9876543210".to_string(),
            role: Some(UserRole::Customer),
        };
        assert!(dto.validate().is_ok());

        dto.role = None;
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn mobile_must_be_ten_digits() {
        let dto = MobileLoginDto {
            country_code: "+91".to_string(),
            mobile: "12345".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = MobileLoginDto {
            country_code: "91".to_string(),
            mobile: "9876543210".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = MobileLoginDto {
            country_code: "+91".to_string(),
            mobile: "9876543210".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn provider_fields_are_required() {
        let dto = RegisterProviderDto {
            username: "fixit".to_string(),
            email: "fixit@example.com".to_string(),
            country_code: "+91".to_string(),
            mobile: "9876543210".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());

        let missing = dto.validate_provider_fields().unwrap_err();
        let fields = missing.field_errors();
        assert!(fields.contains_key("experience_year"));
        assert!(fields.contains_key("service_skill"));
        assert!(fields.contains_key("service_km"));
    }

    #[test]
    fn filtered_user_never_carries_otp() {
        let user = User {
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
            is_verified: true,
            wallet_balance: 0.0,
            is_blocked: false,
            blocked_reason: None,
            otp: Some("123456".to_string()),
            otp_created_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let filtered = FilterUserDto::filter_user(&user);
        let json = serde_json::to_string(&filtered).unwrap();
        assert!(!json.contains("123456"));
        assert!(!json.contains("otp"));
    }
}
