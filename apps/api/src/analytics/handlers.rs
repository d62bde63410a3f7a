use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::analytics::monthly::{monthly_trends, MonthlyTrend};
use crate::analytics::overview::{compute_overview, Overview};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::ApplicationFilter;

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse<T> {
    pub success: bool,
    pub data: T,
}

/// GET /api/analytics/overview
pub async fn handle_overview(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse<Overview>>, AppError> {
    let applications = state
        .store
        .find_applications(&ApplicationFilter::default())
        .await
        .map_err(|source| AppError::Analytics {
            message: "Failed to fetch analytics",
            source,
        })?;

    Ok(Json(AnalyticsResponse {
        success: true,
        data: compute_overview(&applications, Utc::now()),
    }))
}

/// GET /api/analytics/monthly
pub async fn handle_monthly(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse<Vec<MonthlyTrend>>>, AppError> {
    let applications = state
        .store
        .find_applications(&ApplicationFilter::default())
        .await
        .map_err(|source| AppError::Analytics {
            message: "Failed to fetch monthly data",
            source,
        })?;

    Ok(Json(AnalyticsResponse {
        success: true,
        data: monthly_trends(&applications),
    }))
}
