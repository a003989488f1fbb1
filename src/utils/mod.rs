pub mod contact;
pub mod jwt;
