// service/sms.rs
use crate::{config::Config, service::error::ServiceError};

/// Delivers OTPs over SMS. Codes travel out of band only; response bodies
/// never carry them.
#[derive(Debug, Clone)]
pub struct SmsSender {
    gateway_url: Option<String>,
    sender_id: String,
}

impl SmsSender {
    pub fn new(config: &Config) -> Self {
        Self {
            gateway_url: config.sms_gateway_url.clone(),
            sender_id: config.sms_sender_id.clone(),
        }
    }

    pub async fn send_otp(
        &self,
        country_code: &str,
        mobile: &str,
        otp: &str,
    ) -> Result<(), ServiceError> {
        let Some(gateway_url) = &self.gateway_url else {
            tracing::warn!(
                "SMS gateway not configured, dropping OTP for {}{}",
                country_code,
                mobile
            );
            return Ok(());
        };

        let client = reqwest::Client::new();
        let payload = serde_json::json!({
            "sender": self.sender_id,
            "to": format!("{}{}", country_code, mobile),
            "message": format!(
                "{} is your Fixnest verification code. It expires in 10 minutes.",
                otp
            )
        });

        let response = client
            .post(gateway_url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::Sms(e.to_string()))?;

        if response.status().is_success() {
            tracing::info!("OTP SMS queued for {}{}", country_code, mobile);
            Ok(())
        } else {
            Err(ServiceError::Sms(format!(
                "SMS gateway responded with {}",
                response.status()
            )))
        }
    }
}
