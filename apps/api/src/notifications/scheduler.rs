//! Injectable job runner for the notification passes.
//!
//! `start` spawns one timer task per job; each tick launches its pass as a
//! detached task, so a slow pass can still be running when the next tick (or
//! another job) fires. `stop` ends the timers but never interrupts a pass
//! already under way.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::notifications::mailer::Mailer;
use crate::notifications::passes::{self, PassContext, PassReport};
use crate::notifications::{JobKind, NotificationError, NotificationSettingsPolicy};
use crate::store::TrackerStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum JobOutcome {
    Completed(PassReport),
    Failed { error: String },
}

#[derive(Debug, Clone, Default)]
struct JobRecord {
    runs: u64,
    last_started_at: Option<DateTime<Utc>>,
    last_finished_at: Option<DateTime<Utc>>,
    last_outcome: Option<JobOutcome>,
}

/// Snapshot of one job's schedule and last run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub job: JobKind,
    pub schedule: String,
    /// Only set while the timers are running.
    pub next_run_at: Option<DateTime<Local>>,
    pub runs: u64,
    pub last_started_at: Option<DateTime<Utc>>,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub last_outcome: Option<JobOutcome>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct NotificationScheduler {
    store: Arc<dyn TrackerStore>,
    mailer: Arc<dyn Mailer>,
    policy: NotificationSettingsPolicy,
    records: Mutex<HashMap<JobKind, JobRecord>>,
    timers: Mutex<Vec<JoinHandle<()>>>,
    shutdown: watch::Sender<bool>,
}

impl NotificationScheduler {
    pub fn new(
        store: Arc<dyn TrackerStore>,
        mailer: Arc<dyn Mailer>,
        policy: NotificationSettingsPolicy,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            store,
            mailer,
            policy,
            records: Mutex::new(HashMap::new()),
            timers: Mutex::new(Vec::new()),
            shutdown,
        }
    }

    pub fn is_running(&self) -> bool {
        !lock(&self.timers).is_empty()
    }

    /// Arms the timers for every job. Calling it while running is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut timers = lock(&self.timers);
        if !timers.is_empty() {
            warn!("Notification schedulers already running");
            return;
        }

        info!("Initializing notification schedulers...");
        self.shutdown.send_replace(false);
        for job in JobKind::ALL {
            let shutdown = self.shutdown.subscribe();
            timers.push(tokio::spawn(Arc::clone(self).run_timer(job, shutdown)));
            info!(job = %job, schedule = %job.schedule(), "Notification job scheduled");
        }
        info!("Notification schedulers initialized");
    }

    /// Disarms the timers and waits for them to exit. Passes already started keep running.
    pub async fn stop(&self) {
        self.shutdown.send_replace(true);
        let timers = std::mem::take(&mut *lock(&self.timers));
        for timer in timers {
            if let Err(e) = timer.await {
                warn!("Notification timer ended abnormally: {e}");
            }
        }
        info!("Notification schedulers stopped");
    }

    async fn run_timer(self: Arc<Self>, job: JobKind, mut shutdown: watch::Receiver<bool>) {
        let schedule = job.schedule();
        let mut last_fire: Option<DateTime<Local>> = None;
        loop {
            let now = Local::now();
            // a timer that wakes a little early must not fire the same slot twice
            let from = match last_fire {
                Some(prev) if prev > now => prev,
                _ => now,
            };
            let Some(next) = schedule.next_after(&from) else {
                error!(job = %job, "Schedule has no next fire time; timer exiting");
                return;
            };
            let wait = (next - now).to_std().unwrap_or_default();
            debug!(job = %job, next_run = %next, "Waiting for next notification pass");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => return,
            }
            if *shutdown.borrow() {
                return;
            }
            last_fire = Some(next);

            let runner = Arc::clone(&self);
            tokio::spawn(async move {
                // outcome is logged and recorded by run_now
                let _ = runner.run_now(job).await;
            });
        }
    }

    /// Runs `job` immediately against the current time.
    pub async fn run_now(&self, job: JobKind) -> Result<PassReport, NotificationError> {
        self.run_at(job, Local::now()).await
    }

    /// Runs `job` as if the clock read `now`.
    pub async fn run_at(
        &self,
        job: JobKind,
        now: DateTime<Local>,
    ) -> Result<PassReport, NotificationError> {
        self.record_start(job);

        let ctx = PassContext {
            store: self.store.as_ref(),
            mailer: self.mailer.as_ref(),
            policy: self.policy,
        };
        let result = match job {
            JobKind::FollowUpReminders => passes::follow_up_reminders(&ctx, now).await,
            JobKind::InterviewReminders => passes::interview_reminders(&ctx).await,
            JobKind::WeeklySummary => passes::weekly_summaries(&ctx, now).await,
        };

        match &result {
            Ok(report) => info!(
                job = %job,
                candidates = report.candidates,
                sent = report.sent,
                failed = report.failed,
                skipped = report.skipped,
                "Notification pass finished"
            ),
            Err(e) => error!(job = %job, "Error in notification pass: {e}"),
        }

        self.record_finish(job, &result);
        result
    }

    fn record_start(&self, job: JobKind) {
        let mut records = lock(&self.records);
        let record = records.entry(job).or_default();
        record.runs += 1;
        record.last_started_at = Some(Utc::now());
    }

    fn record_finish(&self, job: JobKind, result: &Result<PassReport, NotificationError>) {
        let mut records = lock(&self.records);
        let record = records.entry(job).or_default();
        record.last_finished_at = Some(Utc::now());
        record.last_outcome = Some(match result {
            Ok(report) => JobOutcome::Completed(report.clone()),
            Err(e) => JobOutcome::Failed {
                error: e.to_string(),
            },
        });
    }

    pub fn statuses(&self) -> Vec<JobStatus> {
        let running = self.is_running();
        let now = Local::now();
        let records = lock(&self.records);

        JobKind::ALL
            .into_iter()
            .map(|job| {
                let record = records.get(&job).cloned().unwrap_or_default();
                JobStatus {
                    job,
                    schedule: job.schedule().to_string(),
                    next_run_at: running.then(|| job.schedule().next_after(&now)).flatten(),
                    runs: record.runs,
                    last_started_at: record.last_started_at,
                    last_finished_at: record.last_finished_at,
                    last_outcome: record.last_outcome,
                }
            })
            .collect()
    }
}
