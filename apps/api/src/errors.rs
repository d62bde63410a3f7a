use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::notifications::NotificationError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    /// Persistence failure on a CRUD route; the message reaches the client.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Persistence failure while aggregating; the client sees `message` only.
    #[error("{message}: {source}")]
    Analytics {
        message: &'static str,
        source: StoreError,
    },

    /// Provider failure; the client sees `message` only.
    #[error("{message}: {source}")]
    Ai {
        message: &'static str,
        source: LlmError,
    },

    #[error("Unknown notification job '{0}'")]
    UnknownJob(String),

    #[error("Email notifications are disabled")]
    NotificationsDisabled,

    #[error("Notification pass failed: {0}")]
    Notification(#[from] NotificationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            AppError::Store(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": e.to_string() }),
                )
            }
            AppError::Analytics { message, source } => {
                tracing::error!("Analytics error: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": message }),
                )
            }
            AppError::Ai { message, source } => {
                tracing::error!("AI error: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": message }),
                )
            }
            AppError::UnknownJob(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": self.to_string() }),
            ),
            AppError::NotificationsDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "message": self.to_string() }),
            ),
            AppError::Notification(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": e.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_bad_request_with_message() {
        let (status, body) = render(AppError::Validation("company is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "company is required");
    }

    #[tokio::test]
    async fn test_store_error_leaks_underlying_message() {
        let err = AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], sqlx::Error::PoolTimedOut.to_string());
    }

    #[tokio::test]
    async fn test_analytics_error_hides_cause() {
        let err = AppError::Analytics {
            message: "Failed to fetch analytics",
            source: StoreError::Database(sqlx::Error::PoolTimedOut),
        };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to fetch analytics");
    }

    #[tokio::test]
    async fn test_ai_error_is_generic() {
        let err = AppError::Ai {
            message: "Failed to analyze resume",
            source: LlmError::Api {
                status: 429,
                message: "rate limited".into(),
            },
        };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to analyze resume");
    }

    #[tokio::test]
    async fn test_disabled_notifications_is_unavailable() {
        let (status, _) = render(AppError::NotificationsDisabled).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
