//! CRUD handlers for `/api/applications`. Each performs a single store call.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::application::{Application, ApplicationUpdate, NewApplication};
use crate::state::AppState;

/// GET /api/applications
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(state.store.list_applications().await?))
}

/// POST /api/applications
///
/// Applications without a `user` are assigned the configured default owner.
pub async fn handle_create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewApplication>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let missing = request.missing_fields();
    if !missing.is_empty() {
        let reasons: Vec<String> = missing.iter().map(|f| format!("{f} is required")).collect();
        return Err(AppError::Validation(format!(
            "Application validation failed: {}",
            reasons.join(", ")
        )));
    }

    let created = state
        .store
        .create_application(state.config.default_owner_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/applications/:id
///
/// Responds `null` when the id is unknown.
pub async fn handle_update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<ApplicationUpdate>,
) -> Result<Json<Option<Application>>, AppError> {
    Ok(Json(state.store.update_application(id, update).await?))
}

/// DELETE /api/applications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.store.delete_application(id).await?;
    Ok(Json(json!({ "message": "Application deleted" })))
}
