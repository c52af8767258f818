// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Payment gateway configuration
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    // SMS gateway configuration; OTPs are dropped with a warning when unset
    pub sms_gateway_url: Option<String>,
    pub sms_sender_id: String,
    // Support contact returned in checkout responses
    pub support_phone: String,
    pub support_email: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");

        // Payment gateway configuration (with defaults)
        let razorpay_key_id = std::env::var("RAZORPAY_KEY_ID")
            .unwrap_or_else(|_| "".to_string());
        let razorpay_key_secret = std::env::var("RAZORPAY_KEY_SECRET")
            .unwrap_or_else(|_| "".to_string());

        // SMS gateway configuration
        let sms_gateway_url = std::env::var("SMS_GATEWAY_URL").ok();
        let sms_sender_id = std::env::var("SMS_SENDER_ID")
            .unwrap_or_else(|_| "FIXNST".to_string());

        let support_phone = std::env::var("SUPPORT_PHONE")
            .unwrap_or_else(|_| "+911234567890".to_string());
        let support_email = std::env::var("SUPPORT_EMAIL")
            .unwrap_or_else(|_| "support@fixnest.in".to_string());

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Config {
            database_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().expect("JWT_MAXAGE must be a number"),
            port: 8000,
            razorpay_key_id,
            razorpay_key_secret,
            sms_gateway_url,
            sms_sender_id,
            support_phone,
            support_email,
            allowed_origins,
        }
    }
}
