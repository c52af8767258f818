pub mod addressdb;
pub mod bankdb;
pub mod bookingdb;
pub mod cartdb;
pub mod catalogdb;
#[allow(clippy::module_inception)]
pub mod db;
pub mod notificationdb;
pub mod paymentdb;
pub mod pendingdb;
pub mod userdb;
