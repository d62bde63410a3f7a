use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::notifications::scheduler::NotificationScheduler;
use crate::store::TrackerStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TrackerStore>,
    /// `None` when no AI provider key is configured.
    pub llm: Option<LlmClient>,
    /// `None` unless email notifications are enabled.
    pub scheduler: Option<Arc<NotificationScheduler>>,
    pub config: Config,
}
