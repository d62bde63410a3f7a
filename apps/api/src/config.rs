use anyhow::{Context, Result};
use uuid::Uuid;

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::notifications::NotificationSettingsPolicy;

/// Owner assigned to applications created without a `user` field.
const PLACEHOLDER_OWNER_ID: &str = "507f1f77-bcf8-6cd7-9943-901100000000";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub ai: AiConfig,
    pub default_owner_id: Uuid,
    /// `Some` only when `ENABLE_EMAIL_NOTIFICATIONS=true`.
    pub notifications: Option<NotificationConfig>,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub email_service: String,
    pub email_user: String,
    pub email_password: String,
    pub settings_policy: NotificationSettingsPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };

        let notifications = if flag("ENABLE_EMAIL_NOTIFICATIONS") {
            Some(NotificationConfig {
                email_service: lookup("EMAIL_SERVICE").unwrap_or_else(|| "gmail".to_string()),
                email_user: require("EMAIL_USER")?,
                email_password: require("EMAIL_PASSWORD")?,
                settings_policy: if flag("NOTIFICATION_HONOR_USER_SETTINGS") {
                    NotificationSettingsPolicy::Honor
                } else {
                    NotificationSettingsPolicy::Ignore
                },
            })
        } else {
            None
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            ai: AiConfig {
                api_key: lookup("AI_API_KEY")
                    .or_else(|| lookup("GROQ_API_KEY"))
                    .filter(|k| !k.trim().is_empty()),
                api_url: lookup("AI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                model: lookup("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            },
            default_owner_id: match lookup("DEFAULT_OWNER_ID") {
                Some(id) => id
                    .parse()
                    .context("DEFAULT_OWNER_ID must be a valid UUID")?,
                None => Uuid::parse_str(PLACEHOLDER_OWNER_ID)?,
            },
            notifications,
        })
    }
}
