mod appliances;
pub mod auth;
mod error;
mod maintenance;
mod properties;
mod rent_payments;
mod reports;
mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes; register and login are the only public endpoints
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/me", put(auth::update_me));

    // Resource routes; authentication is enforced by the User extractor
    // every handler takes, so none of these can skip the check
    let api_routes = Router::new()
        // Properties
        .route("/properties", get(properties::list_properties))
        .route("/properties", post(properties::create_property))
        .route("/property/:id", get(properties::get_property))
        .route("/property/:id", put(properties::update_property))
        .route("/property/:id", delete(properties::delete_property))
        .route("/property/:id/payments", get(rent_payments::list_property_payments))
        // Appliances
        .route("/appliances", post(appliances::create_appliance))
        .route("/appliances/:id", get(appliances::get_appliance))
        .route("/appliances/:id", put(appliances::update_appliance))
        .route("/appliances/:id", delete(appliances::delete_appliance))
        .route("/appliances/:id/maintenance", get(maintenance::list_maintenance))
        .route("/appliances/:id/maintenance", post(maintenance::create_maintenance))
        .route("/maintenance/:id", delete(maintenance::delete_maintenance))
        // Rent payments
        .route("/rent-payments", post(rent_payments::create_rent_payment))
        .route("/rent-payments/:id", put(rent_payments::update_rent_payment))
        .route("/rent-payments/:id", delete(rent_payments::delete_rent_payment))
        // Reports
        .route("/rent-status", get(reports::rent_status))
        .route("/dashboard", get(reports::dashboard));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
