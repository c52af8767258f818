// service/payment_gateway.rs
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::{config::Config, service::error::ServiceError};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderIntent {
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentDetails {
    pub payment_id: String,
    pub method: Option<String>,
    pub receipt: Option<String>,
}

/// Boundary to the payment provider. Checkout creates an order before any
/// row is written; payment verification confirms the captured payment.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        amount: f64,
        currency: &str,
        receipt: &str,
    ) -> Result<OrderIntent, ServiceError>;

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails, ServiceError>;

    /// Publishable key the client needs to open the payment sheet.
    fn public_key(&self) -> &str;
}

/// HMAC-SHA256 over "order_id|payment_id", hex encoded. This is the scheme
/// Razorpay signs checkout callbacks with.
pub fn compute_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn signature_matches(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let expected = compute_signature(secret, order_id, payment_id);
    if expected.is_empty() {
        return false;
    }
    expected.as_bytes().ct_eq(signature.as_bytes()).into()
}

pub struct RazorpayGateway {
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl RazorpayGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            key_id: config.razorpay_key_id.clone(),
            key_secret: config.razorpay_key_secret.clone(),
            base_url: "https://api.razorpay.com/v1".to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount: f64,
        currency: &str,
        receipt: &str,
    ) -> Result<OrderIntent, ServiceError> {
        let amount_paise = (amount * 100.0).round() as i64;

        let client = reqwest::Client::new();
        let payload = serde_json::json!({
            "amount": amount_paise,
            "currency": currency,
            "receipt": receipt,
            "payment_capture": 1
        });

        let response = client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::Gateway(e.to_string()))?;

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Gateway(e.to_string()))?;

        match response_body["id"].as_str() {
            Some(order_id) => Ok(OrderIntent {
                order_id: order_id.to_string(),
                amount,
                currency: currency.to_string(),
                status: response_body["status"].as_str().unwrap_or("created").to_string(),
            }),
            None => Err(ServiceError::Gateway(
                response_body["error"]["description"]
                    .as_str()
                    .unwrap_or("Order creation failed")
                    .to_string(),
            )),
        }
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signature_matches(&self.key_secret, order_id, payment_id, signature)
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails, ServiceError> {
        let client = reqwest::Client::new();
        let url = format!("{}/payments/{}", self.base_url, payment_id);

        let response = client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| ServiceError::Gateway(e.to_string()))?;

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Gateway(e.to_string()))?;

        if response_body["id"].as_str() == Some(payment_id) {
            Ok(PaymentDetails {
                payment_id: payment_id.to_string(),
                method: response_body["method"].as_str().map(|s| s.to_string()),
                receipt: response_body["description"].as_str().map(|s| s.to_string()),
            })
        } else {
            Err(ServiceError::Gateway(
                response_body["error"]["description"]
                    .as_str()
                    .unwrap_or("Payment lookup failed")
                    .to_string(),
            ))
        }
    }

    fn public_key(&self) -> &str {
        &self.key_id
    }
}

/// Deterministic gateway used by tests and by local runs without provider
/// keys. Orders are minted locally and signatures follow the same HMAC
/// scheme with the configured secret.
pub struct StaticGateway {
    secret: String,
    fail_orders: bool,
}

impl StaticGateway {
    pub fn new() -> Self {
        Self {
            secret: "local_test_secret".to_string(),
            fail_orders: false,
        }
    }

    /// Every create_order call fails; lets callers exercise the no-op path.
    pub fn failing() -> Self {
        Self {
            secret: "local_test_secret".to_string(),
            fail_orders: true,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl Default for StaticGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for StaticGateway {
    async fn create_order(
        &self,
        amount: f64,
        currency: &str,
        _receipt: &str,
    ) -> Result<OrderIntent, ServiceError> {
        if self.fail_orders {
            return Err(ServiceError::Gateway("order creation refused".to_string()));
        }
        Ok(OrderIntent {
            order_id: format!("order_local_{}", uuid::Uuid::new_v4().simple()),
            amount,
            currency: currency.to_string(),
            status: "created".to_string(),
        })
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signature_matches(&self.secret, order_id, payment_id, signature)
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails, ServiceError> {
        Ok(PaymentDetails {
            payment_id: payment_id.to_string(),
            method: Some("upi".to_string()),
            receipt: None,
        })
    }

    fn public_key(&self) -> &str {
        "rzp_test_local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_roundtrip_verifies() {
        let signature = compute_signature("secret", "order_abc", "pay_xyz");
        assert!(signature_matches("secret", "order_abc", "pay_xyz", &signature));
    }

    #[test]
    fn signature_rejects_tampering() {
        let signature = compute_signature("secret", "order_abc", "pay_xyz");
        assert!(!signature_matches("secret", "order_abc", "pay_other", &signature));
        assert!(!signature_matches("secret", "order_other", "pay_xyz", &signature));
        assert!(!signature_matches("other-secret", "order_abc", "pay_xyz", &signature));
    }

    #[test]
    fn signature_rejects_wrong_length_input() {
        assert!(!signature_matches("secret", "order_abc", "pay_xyz", "deadbeef"));
        assert!(!signature_matches("secret", "order_abc", "pay_xyz", ""));
    }

    #[test]
    fn signature_is_hex_of_expected_width() {
        let signature = compute_signature("secret", "order_abc", "pay_xyz");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn static_gateway_orders_verify_with_its_secret() {
        let gateway = StaticGateway::new();
        let intent = gateway.create_order(500.0, "INR", "rcpt_1").await.unwrap();
        assert!(intent.order_id.starts_with("order_local_"));

        let signature = compute_signature(gateway.secret(), &intent.order_id, "pay_1");
        assert!(gateway.verify_signature(&intent.order_id, "pay_1", &signature));
        assert!(!gateway.verify_signature(&intent.order_id, "pay_2", &signature));
    }

    #[tokio::test]
    async fn failing_gateway_refuses_orders() {
        let gateway = StaticGateway::failing();
        let result = gateway.create_order(500.0, "INR", "rcpt_1").await;
        assert!(matches!(result, Err(ServiceError::Gateway(_))));
    }
}
