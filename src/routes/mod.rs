use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, booking, kitchen, payment, staff, tables};
use crate::middleware::auth::{auth_middleware, require_customer, require_kitchen, require_staff};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Create role-specific governor layers
    let customer_governor = create_role_governor(RateLimitedRole::Customer);
    let kitchen_governor = create_role_governor(RateLimitedRole::Kitchen);
    // IP-based governor for everything unauthenticated
    let public_governor = create_public_governor();

    // Public auth routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Public routes: the menu, table availability, and the payment gateway
    // return URL (the gateway redirects the customer's browser here).
    let public_routes = Router::new()
        .route("/dishes", get(booking::list_dishes))
        .route("/tables/available", get(tables::list_available))
        .route("/payment/callback", get(payment::payment_callback))
        .layer(public_governor);

    // Customer wizard routes (requires auth + customer role)
    let booking_routes = Router::new()
        .route("/", post(booking::create_booking))
        .route("/active", get(booking::get_active_booking))
        .route("/{id}", get(booking::get_booking))
        .route("/{id}", put(booking::update_booking))
        .route("/{id}", delete(booking::cancel_booking))
        .route("/{id}/dishes", put(booking::update_dishes))
        .route("/{id}/note", put(booking::update_note))
        .route("/{id}/confirm", post(booking::confirm_booking))
        .route("/{id}/pay", post(payment::retry_payment))
        .layer(customer_governor)
        .layer(middleware::from_fn(require_customer))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Front-desk routes (requires auth + staff role; admins pass)
    let staff_routes = Router::new()
        .route("/bookings", get(staff::list_bookings))
        .route("/bookings", post(staff::create_guest_booking))
        .route("/bookings/{id}/status", put(staff::update_status))
        .route("/bookings/{id}/table", put(staff::reassign_table))
        .route("/bookings/{id}/dishes", put(staff::update_dishes))
        .route("/bookings/{id}/note", put(staff::update_note))
        .route("/tables", get(tables::list_tables))
        .route("/tables", post(tables::create_table))
        .route("/vouchers", post(staff::create_voucher))
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Kitchen routes (requires auth + kitchen role; admins pass)
    let kitchen_routes = Router::new()
        .route("/queue", get(kitchen::queue))
        .route("/bookings/{id}/status", put(kitchen::update_status))
        .layer(kitchen_governor)
        .layer(middleware::from_fn(require_kitchen))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/staff", staff_routes)
        .nest("/api/kitchen", kitchen_routes)
        .with_state(state)
}
