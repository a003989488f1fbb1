pub mod auth;
pub mod booking;
pub mod kitchen;
pub mod payment;
pub mod staff;
pub mod tables;
