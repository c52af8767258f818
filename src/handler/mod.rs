pub mod admin;
pub mod auth;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod provider;
pub mod users;
