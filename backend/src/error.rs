//! Error handling for the Ice Watch backend
//!
//! Store failures are logged with full detail and reported to callers with a
//! fixed, endpoint-specific message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised by dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Unknown sensor id: {0}")]
    UnknownLocation(String),

    #[error("Store query failed: {0}")]
    StoreQuery(#[from] StoreError),
}

/// Application error types, one per endpoint failure mode
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown sensor id: {0}")]
    UnknownLocation(String),

    #[error("Latest query failed")]
    LatestQuery(#[source] StoreError),

    #[error("History query failed")]
    HistoryQuery(#[source] StoreError),

    #[error("Status query failed")]
    StatusQuery(#[source] StoreError),
}

/// Error body used by `/api/latest` and `/api/history`
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

/// Error body used by `/api/status`
#[derive(Serialize)]
pub struct StatusErrorResponse {
    pub success: bool,
    pub error: &'static str,
}

impl AppError {
    /// Classify a history failure
    pub fn history(err: DashboardError) -> Self {
        match err {
            DashboardError::UnknownLocation(id) => AppError::UnknownLocation(id),
            DashboardError::StoreQuery(source) => AppError::HistoryQuery(source),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::UnknownLocation(id) => {
                tracing::warn!(sensor_id = %id, "Rejected unknown sensor id");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Unknown sensor id",
                    }),
                )
                    .into_response()
            }
            AppError::LatestQuery(source) => {
                tracing::error!(error = %source, "Error in /api/latest");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Latest query failed",
                    }),
                )
                    .into_response()
            }
            AppError::HistoryQuery(source) => {
                tracing::error!(error = %source, "Error in /api/history");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "History query failed",
                    }),
                )
                    .into_response()
            }
            AppError::StatusQuery(source) => {
                tracing::error!(error = %source, "Error in /api/status");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(StatusErrorResponse {
                        success: false,
                        error: "Status failed",
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
