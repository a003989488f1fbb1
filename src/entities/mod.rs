pub mod booking;
pub mod booking_dish;
pub mod dining_table;
pub mod dish;
pub mod payment_order;
pub mod user;
pub mod voucher;
