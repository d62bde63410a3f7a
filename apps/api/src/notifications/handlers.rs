use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::notifications::passes::PassReport;
use crate::notifications::scheduler::{JobStatus, NotificationScheduler};
use crate::notifications::JobKind;
use crate::state::AppState;

fn scheduler(state: &AppState) -> Result<&NotificationScheduler, AppError> {
    state
        .scheduler
        .as_deref()
        .ok_or(AppError::NotificationsDisabled)
}

/// GET /api/notifications/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobStatus>>, AppError> {
    Ok(Json(scheduler(&state)?.statuses()))
}

/// POST /api/notifications/jobs/:job/run
///
/// Runs the pass to completion before responding.
pub async fn handle_run_job(
    State(state): State<AppState>,
    Path(job): Path<String>,
) -> Result<Json<PassReport>, AppError> {
    let scheduler = scheduler(&state)?;
    let job: JobKind = job.parse().map_err(AppError::UnknownJob)?;
    Ok(Json(scheduler.run_now(job).await?))
}
