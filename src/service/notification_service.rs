// service/notification_service.rs
use std::sync::Arc;

use crate::{
    db::{db::DBClient, notificationdb::NotificationExt},
    models::{bookingmodel::Booking, usermodel::User},
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Fired once per booking created by checkout. The customer always gets
    /// a row; the technician gets one when the matcher assigned somebody.
    pub async fn booking_confirmed(
        &self,
        customer: &User,
        technician: Option<&User>,
        booking: &Booking,
        service_name: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "booking confirmation notification: booking {} for {}",
            booking.id,
            customer.username
        );

        self.db_client
            .save_notification(
                customer.id,
                technician.map(|t| t.id),
                Some(booking.id),
                "customer",
                "Booking Confirmed",
                &format!("Your booking for {} has been confirmed.", service_name),
                "booking_confirmed",
                "app",
            )
            .await?;

        if let Some(technician) = technician {
            self.db_client
                .save_notification(
                    customer.id,
                    Some(technician.id),
                    Some(booking.id),
                    "provider",
                    "New Job Assigned",
                    &format!("You have been assigned a new {} job.", service_name),
                    "job_assigned",
                    "app",
                )
                .await?;
        }

        Ok(())
    }

    /// Fired when the admin manually assigns or reassigns a technician.
    pub async fn technician_assigned(
        &self,
        customer_id: uuid::Uuid,
        technician: &User,
        booking: &Booking,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            "assignment notification: technician {} on booking {}",
            technician.username,
            booking.id
        );

        self.db_client
            .save_notification(
                customer_id,
                Some(technician.id),
                Some(booking.id),
                "provider",
                "New Job Assigned",
                "A job has been assigned to you by the support team.",
                "job_assigned",
                "app",
            )
            .await?;

        self.db_client
            .save_notification(
                customer_id,
                Some(technician.id),
                Some(booking.id),
                "customer",
                "Technician Assigned",
                &format!("{} will handle your booking.", technician.username),
                "technician_assigned",
                "app",
            )
            .await?;

        Ok(())
    }
}
