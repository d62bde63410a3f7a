use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user email toggles. Whether passes consult them is decided by
/// [`crate::notifications::NotificationSettingsPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct NotificationSettings {
    pub email_enabled: bool,
    pub follow_up_reminders: bool,
    pub interview_reminders: bool,
    pub weekly_summary: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_enabled: true,
            follow_up_reminders: true,
            interview_reminders: true,
            weekly_summary: true,
        }
    }
}

/// Users are created out of band; the API never writes them.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    #[sqlx(flatten)]
    pub notification_settings: NotificationSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
