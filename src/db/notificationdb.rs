// db/notificationdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::notificationmodel::Notification;

#[async_trait]
pub trait NotificationExt {
    #[allow(clippy::too_many_arguments)]
    async fn save_notification(
        &self,
        user_id: Uuid,
        provider_id: Option<Uuid>,
        booking_id: Option<Uuid>,
        recipient_type: &str,
        title: &str,
        message: &str,
        notification_type: &str,
        channel: &str,
    ) -> Result<Notification, sqlx::Error>;

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Notification>, sqlx::Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn save_notification(
        &self,
        user_id: Uuid,
        provider_id: Option<Uuid>,
        booking_id: Option<Uuid>,
        recipient_type: &str,
        title: &str,
        message: &str,
        notification_type: &str,
        channel: &str,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, provider_id, booking_id, recipient_type,
                                       title, message, notification_type, channel)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, provider_id, booking_id, recipient_type,
                      title, message, notification_type, channel, is_sent,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(provider_id)
        .bind(booking_id)
        .bind(recipient_type)
        .bind(title)
        .bind(message)
        .bind(notification_type)
        .bind(channel)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_notifications_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, provider_id, booking_id, recipient_type,
                   title, message, notification_type, channel, is_sent,
                   created_at, updated_at
            FROM notifications
            WHERE (recipient_type = 'customer' AND user_id = $1)
               OR (recipient_type = 'provider' AND provider_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
