// service/matcher.rs
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{catalogmodel::SubCategory, usermodel::Address};

/// Picks a technician for a freshly created booking. Checkout consults the
/// matcher once per cart line; `None` leaves the booking pending for manual
/// assignment by the admin.
#[async_trait]
pub trait ProviderMatcher: Send + Sync {
    async fn select_technician(&self, service: &SubCategory, address: &Address) -> Option<Uuid>;
}

/// Default matcher. Every booking starts pending and waits for the admin.
pub struct NoopMatcher;

#[async_trait]
impl ProviderMatcher for NoopMatcher {
    async fn select_technician(&self, _service: &SubCategory, _address: &Address) -> Option<Uuid> {
        None
    }
}

/// Always returns the same technician. Test double.
pub struct FixedMatcher(pub Uuid);

#[async_trait]
impl ProviderMatcher for FixedMatcher {
    async fn select_technician(&self, _service: &SubCategory, _address: &Address) -> Option<Uuid> {
        Some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_service() -> SubCategory {
        let now = Utc::now();
        SubCategory {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            name: "Fan installation".to_string(),
            description: "".to_string(),
            cover_image: None,
            image: None,
            section: "electrical".to_string(),
            steps: "".to_string(),
            faqs: "".to_string(),
            price: 349.0,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_address() -> Address {
        let now = Utc::now();
        Address {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            label: "home".to_string(),
            address: "221B Baker Street".to_string(),
            city: "Indore".to_string(),
            state: "MP".to_string(),
            pincode: "452001".to_string(),
            is_default: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn noop_matcher_never_assigns() {
        let matcher = NoopMatcher;
        assert!(matcher
            .select_technician(&sample_service(), &sample_address())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn fixed_matcher_returns_its_technician() {
        let technician = Uuid::new_v4();
        let matcher = FixedMatcher(technician);
        assert_eq!(
            matcher
                .select_technician(&sample_service(), &sample_address())
                .await,
            Some(technician)
        );
    }
}
