mod ai;
mod analytics;
mod applications;
mod config;
mod db;
mod errors;
mod extract;
mod llm_client;
mod models;
mod notifications;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::notifications::mailer::SmtpMailer;
use crate::notifications::scheduler::NotificationScheduler;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgStore, TrackerStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Greenhouse API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;
    let store: Arc<dyn TrackerStore> = Arc::new(PgStore::new(db));

    // Initialize LLM client
    let llm = match &config.ai.api_key {
        Some(key) => {
            let client = LlmClient::new(
                key.clone(),
                config.ai.api_url.clone(),
                config.ai.model.clone(),
            )?;
            info!("LLM client initialized (model: {})", client.model());
            Some(client)
        }
        None => {
            warn!("No AI provider key configured; AI endpoints will fail");
            None
        }
    };

    // Email notifications
    let scheduler = match &config.notifications {
        Some(notify) => {
            let mailer = SmtpMailer::new(
                &notify.email_service,
                &notify.email_user,
                &notify.email_password,
            )?;
            let scheduler = Arc::new(NotificationScheduler::new(
                store.clone(),
                Arc::new(mailer),
                notify.settings_policy,
            ));
            scheduler.start();
            info!("Email notification scheduler started");
            Some(scheduler)
        }
        None => {
            info!("Email notifications disabled");
            None
        }
    };

    // Build app state
    let state = AppState {
        store,
        llm,
        scheduler: scheduler.clone(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler {
        scheduler.stop().await;
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
