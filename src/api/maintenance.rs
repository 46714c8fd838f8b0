//! Maintenance record API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{
    Appliance, CreateMaintenanceRequest, MaintenanceRecord, MaintenanceRollup, User,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_cost, validate_date, validate_required, validate_uuid};

/// Maintenance history for an appliance: the records plus their cost rollup
#[derive(Debug, Serialize)]
pub struct MaintenanceHistoryResponse {
    pub appliance_id: String,
    pub records: Vec<MaintenanceRecord>,
    pub rollup: MaintenanceRollup,
}

fn validate_create_request(req: &CreateMaintenanceRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_required(&req.description, "Description") {
        errors.add("description", e);
    }
    if let Err(e) = validate_cost(req.cost) {
        errors.add("cost", e);
    }
    if let Err(e) = validate_date(&req.performed_at, "Performed date") {
        errors.add("performed_at", e);
    }

    errors.finish()
}

/// List an appliance's maintenance records with the cost rollup
pub async fn list_maintenance(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<MaintenanceHistoryResponse>, ApiError> {
    if let Err(e) = validate_uuid(&id, "appliance_id") {
        return Err(ApiError::validation_field("appliance_id", e));
    }

    // Ownership gate before touching the rollup
    Appliance::get_for_owner(&state.db, &id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Appliance not found"))?;

    let records = MaintenanceRecord::list_for_appliance(&state.db, &id, &user.id).await?;
    let rollup = MaintenanceRollup::for_appliance(&state.db, &id).await?;

    Ok(Json(MaintenanceHistoryResponse {
        appliance_id: id,
        records,
        rollup,
    }))
}

/// Record a maintenance event for an appliance
pub async fn create_maintenance(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
    Json(req): Json<CreateMaintenanceRequest>,
) -> Result<(StatusCode, Json<MaintenanceRecord>), ApiError> {
    if let Err(e) = validate_uuid(&id, "appliance_id") {
        return Err(ApiError::validation_field("appliance_id", e));
    }
    validate_create_request(&req)?;

    let record = MaintenanceRecord::create(&state.db, &user.id, &id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Appliance not found"))?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Delete a maintenance record
pub async fn delete_maintenance(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Err(e) = validate_uuid(&id, "record_id") {
        return Err(ApiError::validation_field("record_id", e));
    }

    if !MaintenanceRecord::delete(&state.db, &id, &user.id).await? {
        return Err(ApiError::not_found("Maintenance record not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
