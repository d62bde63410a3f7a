//! Scheduled email notifications.
//!
//! [`scheduler::NotificationScheduler`] owns three jobs, each firing a pass
//! (see [`passes`]) on a fixed wall-clock [`schedule::Schedule`]. The scheduler
//! is an ordinary value held in `AppState`: it can be started, stopped, and
//! asked to run a pass synchronously.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::Serialize;
use thiserror::Error;

use crate::models::user::NotificationSettings;
use crate::notifications::schedule::Schedule;
use crate::store::StoreError;

pub mod handlers;
pub mod mailer;
pub mod passes;
pub mod schedule;
pub mod scheduler;
pub mod templates;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("failed to load notification data: {0}")]
    Store(#[from] StoreError),

    #[error("no local time window for {0}")]
    InvalidWindow(chrono::NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    InterviewReminders,
    FollowUpReminders,
    WeeklySummary,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [
        JobKind::InterviewReminders,
        JobKind::FollowUpReminders,
        JobKind::WeeklySummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::InterviewReminders => "interview-reminders",
            JobKind::FollowUpReminders => "follow-up-reminders",
            JobKind::WeeklySummary => "weekly-summary",
        }
    }

    /// Interview reminders daily 08:00, follow-ups daily 09:00, summary Mondays 09:00.
    pub fn schedule(&self) -> Schedule {
        match self {
            JobKind::InterviewReminders => Schedule::Daily { hour: 8, minute: 0 },
            JobKind::FollowUpReminders => Schedule::Daily { hour: 9, minute: 0 },
            JobKind::WeeklySummary => Schedule::Weekly {
                weekday: Weekday::Mon,
                hour: 9,
                minute: 0,
            },
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobKind::ALL
            .into_iter()
            .find(|job| job.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Whether passes consult the per-user notification toggles.
///
/// `Ignore` sends to every owner regardless of their settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationSettingsPolicy {
    #[default]
    Ignore,
    Honor,
}

impl NotificationSettingsPolicy {
    pub fn allows(&self, job: JobKind, settings: &NotificationSettings) -> bool {
        match self {
            NotificationSettingsPolicy::Ignore => true,
            NotificationSettingsPolicy::Honor => {
                settings.email_enabled
                    && match job {
                        JobKind::InterviewReminders => settings.interview_reminders,
                        JobKind::FollowUpReminders => settings.follow_up_reminders,
                        JobKind::WeeklySummary => settings.weekly_summary,
                    }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_names_round_trip_through_from_str() {
        for job in JobKind::ALL {
            assert_eq!(job.as_str().parse::<JobKind>().unwrap(), job);
            assert_eq!(
                serde_json::to_value(job).unwrap(),
                serde_json::json!(job.as_str())
            );
        }
        assert_eq!("daily-digest".parse::<JobKind>().unwrap_err(), "daily-digest");
    }

    #[test]
    fn test_ignore_policy_sends_even_when_everything_is_off() {
        let off = NotificationSettings {
            email_enabled: false,
            follow_up_reminders: false,
            interview_reminders: false,
            weekly_summary: false,
        };
        for job in JobKind::ALL {
            assert!(NotificationSettingsPolicy::Ignore.allows(job, &off));
        }
    }

    #[test]
    fn test_honor_policy_checks_master_and_job_toggle() {
        let policy = NotificationSettingsPolicy::Honor;
        let defaults = NotificationSettings::default();
        assert!(policy.allows(JobKind::WeeklySummary, &defaults));

        let no_interviews = NotificationSettings {
            interview_reminders: false,
            ..defaults
        };
        assert!(!policy.allows(JobKind::InterviewReminders, &no_interviews));
        assert!(policy.allows(JobKind::FollowUpReminders, &no_interviews));

        let muted = NotificationSettings {
            email_enabled: false,
            ..defaults
        };
        assert!(!policy.allows(JobKind::FollowUpReminders, &muted));
    }
}
