pub mod access;
pub mod error;
pub mod matcher;
pub mod notification_service;
pub mod patch;
pub mod payment_gateway;
pub mod sms;
