use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Percent of the pre-order subtotal collected online as a deposit.
    pub deposit_percent: i64,
    /// Delivery orders at or above this subtotal ship free.
    pub free_shipping_threshold: i64,
    /// Flat shipping fee below the free-shipping threshold.
    pub shipping_flat_fee: i64,
    pub payment_gateway_url: String,
    pub payment_return_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            deposit_percent: env::var("DEPOSIT_PERCENT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("DEPOSIT_PERCENT must be a number"),
            free_shipping_threshold: env::var("FREE_SHIPPING_THRESHOLD")
                .unwrap_or_else(|_| "800000".to_string())
                .parse()
                .expect("FREE_SHIPPING_THRESHOLD must be a number"),
            shipping_flat_fee: env::var("SHIPPING_FLAT_FEE")
                .unwrap_or_else(|_| "25000".to_string())
                .parse()
                .expect("SHIPPING_FLAT_FEE must be a number"),
            payment_gateway_url: env::var("PAYMENT_GATEWAY_URL")
                .unwrap_or_else(|_| "https://sandbox.payment.example/pay".to_string()),
            payment_return_url: env::var("PAYMENT_RETURN_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/payment/callback".to_string()),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
