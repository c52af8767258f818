use chrono::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile change captured verbatim at PATCH time, applied only on approval.
///
/// `approved` stays NULL until an admin reviews; `reviewed` marks the entry
/// as consumed either way.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PendingProfileUpdate {
    pub id: uuid::Uuid,
    pub profile_id: uuid::Uuid,
    pub data: serde_json::Value,
    pub approved: Option<bool>,
    pub reviewed: bool,
    pub reviewed_by: Option<uuid::Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PendingBankDetailUpdate {
    pub id: uuid::Uuid,
    pub bank_detail_id: uuid::Uuid,
    pub data: serde_json::Value,
    pub approved: Option<bool>,
    pub reviewed: bool,
    pub reviewed_by: Option<uuid::Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
