//! The three notification passes. Each scans the current data set once and
//! sends at most one email per candidate; nothing records what was sent, so a
//! later pass over the same data sends again.

use std::collections::HashMap;

use chrono::{
    DateTime, Days, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::user::User;
use crate::notifications::mailer::{Mailer, OutgoingEmail};
use crate::notifications::templates::{self, EmailContent};
use crate::notifications::{JobKind, NotificationError, NotificationSettingsPolicy};
use crate::store::{ApplicationFilter, TrackerStore};

const FOLLOW_UP_AFTER_DAYS: u64 = 7;
const SUMMARY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub job: JobKind,
    /// Applications (or users, for the weekly summary) selected by the pass.
    pub candidates: usize,
    pub sent: usize,
    pub failed: usize,
    /// Reminder candidates without an owner or owner email, or anyone muted by
    /// the settings policy.
    pub skipped: usize,
}

impl PassReport {
    fn new(job: JobKind, candidates: usize) -> Self {
        Self {
            job,
            candidates,
            sent: 0,
            failed: 0,
            skipped: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyStats {
    pub total_applications: usize,
    pub interviews: usize,
    pub offers: usize,
    pub this_week: usize,
}

pub fn weekly_stats(applications: &[Application], now: DateTime<Utc>) -> WeeklyStats {
    let since = now - Duration::days(SUMMARY_WINDOW_DAYS);
    let with_status = |status| applications.iter().filter(|a| a.status == status).count();

    WeeklyStats {
        total_applications: applications.len(),
        interviews: with_status(ApplicationStatus::Interview),
        offers: with_status(ApplicationStatus::Offer),
        this_week: applications
            .iter()
            .filter(|a| a.applied_date >= since)
            .count(),
    }
}

/// First instant of `day`. When local midnight falls in a DST gap, the day
/// starts at the first hour that exists.
fn start_of_day<Tz: TimeZone>(
    day: NaiveDate,
    resolve: impl Fn(&NaiveDateTime) -> LocalResult<DateTime<Tz>>,
) -> Option<DateTime<Tz>> {
    (0..24).find_map(|hour| resolve(&day.and_hms_opt(hour, 0, 0)?).earliest())
}

/// `[start of day, start of next day - 1ms]` of `day` in local time, as UTC instants.
fn local_day_bounds(day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let resolve = |naive: &NaiveDateTime| Local.from_local_datetime(naive);
    let start = start_of_day(day, resolve)?;
    let next = start_of_day(day.succ_opt()?, resolve)?;
    Some((
        start.with_timezone(&Utc),
        next.with_timezone(&Utc) - Duration::milliseconds(1),
    ))
}

/// Borrowed dependencies of a single pass.
pub struct PassContext<'a> {
    pub store: &'a dyn TrackerStore,
    pub mailer: &'a dyn Mailer,
    pub policy: NotificationSettingsPolicy,
}

impl PassContext<'_> {
    async fn deliver(&self, report: &mut PassReport, to: &str, content: EmailContent) {
        let email = OutgoingEmail {
            to: to.to_string(),
            subject: content.subject,
            html: content.html,
        };
        match self.mailer.send(email).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                warn!(job = %report.job, recipient = to, "Email error: {e}");
                report.failed += 1;
            }
        }
    }

    /// Sends one email per application to its owner. Owners are looked up once per pass.
    async fn notify_owners(
        &self,
        job: JobKind,
        applications: &[Application],
        build: fn(&Application) -> EmailContent,
    ) -> Result<PassReport, NotificationError> {
        let mut report = PassReport::new(job, applications.len());
        let mut owners: HashMap<Uuid, Option<User>> = HashMap::new();

        for application in applications {
            if !owners.contains_key(&application.user) {
                let owner = self.store.find_user(application.user).await?;
                owners.insert(application.user, owner);
            }

            let reachable = owners
                .get(&application.user)
                .and_then(Option::as_ref)
                .filter(|owner| !owner.email.trim().is_empty());

            let Some(owner) = reachable else {
                report.skipped += 1;
                continue;
            };
            if !self.policy.allows(job, &owner.notification_settings) {
                report.skipped += 1;
                continue;
            }

            self.deliver(&mut report, &owner.email, build(application))
                .await;
        }

        Ok(report)
    }
}

/// Applications still `Applied` whose applied date is exactly seven calendar days ago.
pub async fn follow_up_reminders(
    ctx: &PassContext<'_>,
    now: DateTime<Local>,
) -> Result<PassReport, NotificationError> {
    info!("Checking for follow-up reminders...");

    let day = now
        .date_naive()
        .checked_sub_days(Days::new(FOLLOW_UP_AFTER_DAYS))
        .ok_or(NotificationError::InvalidWindow(now.date_naive()))?;
    let (from, to) = local_day_bounds(day).ok_or(NotificationError::InvalidWindow(day))?;

    let filter =
        ApplicationFilter::with_status(ApplicationStatus::Applied).applied_between(from, to);
    let applications = ctx.store.find_applications(&filter).await?;

    ctx.notify_owners(
        JobKind::FollowUpReminders,
        &applications,
        templates::follow_up_reminder,
    )
    .await
}

/// Every application currently in `Interview`, on every run.
pub async fn interview_reminders(ctx: &PassContext<'_>) -> Result<PassReport, NotificationError> {
    info!("Checking for interview reminders...");

    let filter = ApplicationFilter::with_status(ApplicationStatus::Interview);
    let applications = ctx.store.find_applications(&filter).await?;

    ctx.notify_owners(
        JobKind::InterviewReminders,
        &applications,
        templates::interview_reminder,
    )
    .await
}

/// One summary per user, computed from that user's applications. Every user is
/// attempted; an unusable address shows up as a failed send.
pub async fn weekly_summaries(
    ctx: &PassContext<'_>,
    now: DateTime<Local>,
) -> Result<PassReport, NotificationError> {
    info!("Sending weekly summaries...");

    let users = ctx.store.list_users().await?;
    let mut report = PassReport::new(JobKind::WeeklySummary, users.len());

    for user in &users {
        if !ctx
            .policy
            .allows(JobKind::WeeklySummary, &user.notification_settings)
        {
            report.skipped += 1;
            continue;
        }

        let applications = ctx
            .store
            .find_applications(&ApplicationFilter::for_user(user.id))
            .await?;
        let stats = weekly_stats(&applications, now.with_timezone(&Utc));

        ctx.deliver(&mut report, &user.email, templates::weekly_summary(&stats))
            .await;
    }

    Ok(report)
}
