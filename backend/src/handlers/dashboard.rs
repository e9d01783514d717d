//! HTTP handlers for the dashboard endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use shared::{DashboardRecord, OverallStatus};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Response for `/api/latest`
#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub success: bool,
    pub data: Vec<DashboardRecord>,
}

/// Response for `/api/status`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub overall_status: OverallStatus,
}

/// Latest aggregate per location, used by the cards at the top
pub async fn get_latest(State(state): State<AppState>) -> AppResult<Json<LatestResponse>> {
    let data = state
        .dashboard
        .latest_per_location()
        .await
        .map_err(AppError::LatestQuery)?;

    Ok(Json(LatestResponse {
        success: true,
        data,
    }))
}

/// Last hour of aggregates for one location, used by the charts.
///
/// Returns a bare array rather than the `{ success, data }` envelope.
pub async fn get_history(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
) -> AppResult<Json<Vec<DashboardRecord>>> {
    let records = state
        .dashboard
        .history_since(&sensor_id, Utc::now())
        .await
        .map_err(AppError::history)?;

    Ok(Json(records))
}

/// Overall safety status across all locations
pub async fn get_status(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    let overall_status = state
        .dashboard
        .overall_status()
        .await
        .map_err(AppError::StatusQuery)?;

    Ok(Json(StatusResponse {
        success: true,
        overall_status,
    }))
}
