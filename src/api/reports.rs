//! Reporting API endpoints: rent status and dashboard.

use axum::{extract::State, Json};
use chrono::{Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{DashboardSummary, MonthlyTotal, RentStatusEntry, User};
use crate::AppState;

use super::error::ApiError;

/// Dashboard payload: portfolio totals plus this year's per-month analytics
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub totals: DashboardSummary,
    pub monthly_totals: Vec<MonthlyTotal>,
}

/// Per-property rent standing for the caller
pub async fn rent_status(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<RentStatusEntry>>, ApiError> {
    let today = Utc::now().date_naive();
    let report = RentStatusEntry::list_for_owner(&state.db, &user.id, today).await?;
    Ok(Json(report))
}

/// Portfolio dashboard for the caller
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<DashboardResponse>, ApiError> {
    let today = Utc::now().date_naive();

    let totals = DashboardSummary::for_owner(&state.db, &user.id, today).await?;
    let monthly_totals = MonthlyTotal::list_for_year(&state.db, &user.id, today.year()).await?;

    Ok(Json(DashboardResponse {
        totals,
        monthly_totals,
    }))
}
