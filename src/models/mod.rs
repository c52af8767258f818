pub mod bookingmodel;
pub mod cartmodel;
pub mod catalogmodel;
pub mod notificationmodel;
pub mod paymentmodel;
pub mod pendingmodel;
pub mod usermodel;
