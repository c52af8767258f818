use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Notification {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub provider_id: Option<uuid::Uuid>,
    pub booking_id: Option<uuid::Uuid>,
    /// "customer" or "provider"; selects which party the row addresses.
    pub recipient_type: String,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub channel: String,
    pub is_sent: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
