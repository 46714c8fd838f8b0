//! Rent payment API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    CreateRentPaymentRequest, Property, RentPayment, UpdateRentPaymentRequest, User,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_amount, validate_date, validate_uuid};

fn validate_payment_fields(amount: f64, payment_date: &str) -> ValidationErrorBuilder {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_amount(amount) {
        errors.add("amount", e);
    }
    if let Err(e) = validate_date(payment_date, "Payment date") {
        errors.add("payment_date", e);
    }

    errors
}

/// Record a rent payment against one of the caller's properties
pub async fn create_rent_payment(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(req): Json<CreateRentPaymentRequest>,
) -> Result<(StatusCode, Json<RentPayment>), ApiError> {
    let mut errors = validate_payment_fields(req.amount, &req.payment_date);
    if let Err(e) = validate_uuid(&req.property_id, "property_id") {
        errors.add("property_id", e);
    }
    errors.finish()?;

    let payment = RentPayment::create(&state.db, &user.id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;

    tracing::info!(payment_id = %payment.id, amount = payment.amount, "Rent payment recorded");

    Ok((StatusCode::CREATED, Json(payment)))
}

/// List payments for one of the caller's properties, newest first
pub async fn list_property_payments(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Vec<RentPayment>>, ApiError> {
    if let Err(e) = validate_uuid(&id, "property_id") {
        return Err(ApiError::validation_field("property_id", e));
    }

    // Distinguish "no payments yet" from "not your property"
    Property::get_for_owner(&state.db, &id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;

    let payments = RentPayment::list_for_property(&state.db, &id, &user.id).await?;
    Ok(Json(payments))
}

/// Update a rent payment
pub async fn update_rent_payment(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
    Json(req): Json<UpdateRentPaymentRequest>,
) -> Result<Json<RentPayment>, ApiError> {
    if let Err(e) = validate_uuid(&id, "payment_id") {
        return Err(ApiError::validation_field("payment_id", e));
    }
    validate_payment_fields(req.amount, &req.payment_date).finish()?;

    let payment = RentPayment::update(&state.db, &id, &user.id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Rent payment not found"))?;

    Ok(Json(payment))
}

/// Delete a rent payment
pub async fn delete_rent_payment(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Err(e) = validate_uuid(&id, "payment_id") {
        return Err(ApiError::validation_field("payment_id", e));
    }

    if !RentPayment::delete(&state.db, &id, &user.id).await? {
        return Err(ApiError::not_found("Rent payment not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
