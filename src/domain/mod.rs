pub mod billing;
pub mod payment;
pub mod status;
pub mod tables;
