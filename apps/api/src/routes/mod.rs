pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::ai::handlers as ai;
use crate::analytics::handlers as analytics;
use crate::applications::handlers as applications;
use crate::notifications::handlers as notifications;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Applications
        .route(
            "/api/applications",
            get(applications::handle_list).post(applications::handle_create),
        )
        .route(
            "/api/applications/:id",
            put(applications::handle_update).delete(applications::handle_delete),
        )
        // Analytics
        .route("/api/analytics/overview", get(analytics::handle_overview))
        .route("/api/analytics/monthly", get(analytics::handle_monthly))
        // AI
        .route("/api/ai/analyze-resume", post(ai::handle_analyze_resume))
        .route(
            "/api/ai/generate-cover-letter",
            post(ai::handle_generate_cover_letter),
        )
        // Notifications
        .route("/api/notifications/jobs", get(notifications::handle_list_jobs))
        .route(
            "/api/notifications/jobs/:job/run",
            post(notifications::handle_run_job),
        )
        .with_state(state)
}
