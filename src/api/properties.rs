//! Properties API endpoints.
//!
//! Every handler takes the authenticated `User` extractor; the owner id is
//! threaded into each repository call, so a property owned by someone else
//! is indistinguishable from a missing one.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    Appliance, CreatePropertyRequest, Property, PropertySummary, PropertyWithAppliances,
    UpdatePropertyRequest, User,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_optional_amount, validate_required, validate_uuid};

fn validate_payload(
    address: &str,
    property_type: &Option<String>,
    monthly_rent: Option<f64>,
) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_required(address, "Address") {
        errors.add("address", e);
    }
    if let Some(pt) = property_type {
        if pt.len() > 100 {
            errors.add("property_type", "Property type is too long (max 100 characters)");
        }
    }
    if let Err(e) = validate_optional_amount(monthly_rent) {
        errors.add("monthly_rent", e);
    }

    errors.finish()
}

/// List the caller's properties with appliance counts
pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<PropertySummary>>, ApiError> {
    let properties = PropertySummary::list_for_owner(&state.db, &user.id).await?;
    Ok(Json(properties))
}

/// Create a new property
pub async fn create_property(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(req): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    validate_payload(&req.address, &req.property_type, req.monthly_rent)?;

    let property = Property::create(&state.db, &user.id, &req).await?;

    tracing::info!(property_id = %property.id, "Property created");

    Ok((StatusCode::CREATED, Json(property)))
}

/// Get a property with its appliances
pub async fn get_property(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<PropertyWithAppliances>, ApiError> {
    if let Err(e) = validate_uuid(&id, "property_id") {
        return Err(ApiError::validation_field("property_id", e));
    }

    let property = Property::get_for_owner(&state.db, &id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;

    let appliances = Appliance::list_for_property(&state.db, &id, &user.id).await?;

    Ok(Json(PropertyWithAppliances {
        property,
        appliances,
    }))
}

/// Update a property's mutable fields
pub async fn update_property(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
    Json(req): Json<UpdatePropertyRequest>,
) -> Result<Json<Property>, ApiError> {
    if let Err(e) = validate_uuid(&id, "property_id") {
        return Err(ApiError::validation_field("property_id", e));
    }
    validate_payload(&req.address, &req.property_type, req.monthly_rent)?;

    let property = Property::update(&state.db, &id, &user.id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;

    Ok(Json(property))
}

/// Delete a property; its appliances and payments cascade with it
pub async fn delete_property(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Err(e) = validate_uuid(&id, "property_id") {
        return Err(ApiError::validation_field("property_id", e));
    }

    if !Property::delete(&state.db, &id, &user.id).await? {
        return Err(ApiError::not_found("Property not found"));
    }

    tracing::info!(property_id = %id, "Property deleted");

    Ok(StatusCode::NO_CONTENT)
}
