//! Appliances API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{Appliance, CreateApplianceRequest, UpdateApplianceRequest, User};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_optional_date, validate_required, validate_uuid};

fn validate_create_request(req: &CreateApplianceRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_uuid(&req.property_id, "property_id") {
        errors.add("property_id", e);
    }
    if let Err(e) = validate_required(&req.name, "Name") {
        errors.add("name", e);
    }
    if let Err(e) = validate_optional_date(&req.installation_date, "Installation date") {
        errors.add("installation_date", e);
    }
    if let Err(e) = validate_optional_date(&req.last_maintenance, "Last maintenance date") {
        errors.add("last_maintenance", e);
    }

    errors.finish()
}

fn validate_update_request(req: &UpdateApplianceRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_required(&req.name, "Name") {
        errors.add("name", e);
    }
    // Not defaulted on update: the caller resends the current value or a new one
    if let Err(e) = validate_required(&req.status, "Status") {
        errors.add("status", e);
    }
    if let Err(e) = validate_optional_date(&req.installation_date, "Installation date") {
        errors.add("installation_date", e);
    }
    if let Err(e) = validate_optional_date(&req.last_maintenance, "Last maintenance date") {
        errors.add("last_maintenance", e);
    }

    errors.finish()
}

/// Create a new appliance under one of the caller's properties
pub async fn create_appliance(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(req): Json<CreateApplianceRequest>,
) -> Result<(StatusCode, Json<Appliance>), ApiError> {
    validate_create_request(&req)?;

    let appliance = Appliance::create(&state.db, &user.id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;

    tracing::info!(appliance_id = %appliance.id, "Appliance created");

    Ok((StatusCode::CREATED, Json(appliance)))
}

/// Get an appliance by id
pub async fn get_appliance(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Appliance>, ApiError> {
    if let Err(e) = validate_uuid(&id, "appliance_id") {
        return Err(ApiError::validation_field("appliance_id", e));
    }

    let appliance = Appliance::get_for_owner(&state.db, &id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Appliance not found"))?;

    Ok(Json(appliance))
}

/// Update an appliance's mutable fields
pub async fn update_appliance(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
    Json(req): Json<UpdateApplianceRequest>,
) -> Result<Json<Appliance>, ApiError> {
    if let Err(e) = validate_uuid(&id, "appliance_id") {
        return Err(ApiError::validation_field("appliance_id", e));
    }
    validate_update_request(&req)?;

    let appliance = Appliance::update(&state.db, &id, &user.id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Appliance not found"))?;

    Ok(Json(appliance))
}

/// Delete an appliance
pub async fn delete_appliance(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Err(e) = validate_uuid(&id, "appliance_id") {
        return Err(ApiError::validation_field("appliance_id", e));
    }

    if !Appliance::delete(&state.db, &id, &user.id).await? {
        return Err(ApiError::not_found("Appliance not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
