//! In-memory store, recording mailer and fixtures shared by unit and router tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::models::application::{
    Application, ApplicationStatus, ApplicationUpdate, NewApplication,
};
use crate::models::user::{NotificationSettings, User};
use crate::notifications::mailer::{MailError, Mailer, OutgoingEmail};
use crate::state::AppState;
use crate::store::{ApplicationFilter, StoreError, TrackerStore};

/// Keeps records in insertion order, which doubles as creation order.
#[derive(Default)]
pub struct MemoryStore {
    applications: Mutex<Vec<Application>>,
    users: Mutex<Vec<User>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn add_user(&self, user: User) -> User {
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn add_application(&self, application: Application) -> Application {
        self.applications.lock().unwrap().push(application.clone());
        application
    }

    pub fn applications(&self) -> Vec<Application> {
        self.applications.lock().unwrap().clone()
    }

    /// Every later read fails as if the pool were unreachable.
    pub fn fail_reads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl TrackerStore for MemoryStore {
    async fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        self.check()?;
        Ok(self.applications().into_iter().rev().collect())
    }

    async fn find_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, StoreError> {
        self.check()?;
        Ok(self
            .applications()
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect())
    }

    async fn create_application(
        &self,
        owner: Uuid,
        new: NewApplication,
    ) -> Result<Application, StoreError> {
        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            user: new.user.unwrap_or(owner),
            company: new.company,
            position: new.position,
            status: new.status.unwrap_or_default(),
            salary: new.salary,
            location: new.location,
            job_url: new.job_url,
            description: new.description,
            notes: new.notes,
            applied_date: new.applied_date.unwrap_or(now),
            follow_up_date: new.follow_up_date,
            resume_used: new.resume_used,
            cover_letter: new.cover_letter,
            created_at: now,
            updated_at: now,
        };
        Ok(self.add_application(application))
    }

    async fn update_application(
        &self,
        id: Uuid,
        update: ApplicationUpdate,
    ) -> Result<Option<Application>, StoreError> {
        let mut applications = self.applications.lock().unwrap();
        Ok(applications.iter_mut().find(|a| a.id == id).map(|app| {
            update.apply_to(app);
            app.updated_at = Utc::now();
            app.clone()
        }))
    }

    async fn delete_application(&self, id: Uuid) -> Result<(), StoreError> {
        self.applications.lock().unwrap().retain(|a| a.id != id);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }
}

/// Captures delivered mail; optionally bounces one recipient.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    bounce: Option<String>,
}

impl RecordingMailer {
    pub fn failing_for(address: &str) -> Self {
        Self {
            bounce: Some(address.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if self.bounce.as_deref() == Some(email.to.as_str()) {
            let err = "bounced".parse::<lettre::Address>().unwrap_err();
            return Err(MailError::Address(err));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

pub fn user(email: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        password: "hashed".to_string(),
        notification_settings: NotificationSettings::default(),
        created_at: now,
        updated_at: now,
    }
}

pub fn application(
    company: &str,
    status: ApplicationStatus,
    applied: DateTime<Utc>,
) -> Application {
    application_owned_by(Uuid::new_v4(), company, status, applied)
}

pub fn application_owned_by(
    owner: Uuid,
    company: &str,
    status: ApplicationStatus,
    applied: DateTime<Utc>,
) -> Application {
    Application {
        id: Uuid::new_v4(),
        user: owner,
        company: company.to_string(),
        position: "Software Engineer".to_string(),
        status,
        salary: None,
        location: None,
        job_url: None,
        description: None,
        notes: None,
        applied_date: applied,
        follow_up_date: None,
        resume_used: None,
        cover_letter: None,
        created_at: applied,
        updated_at: applied,
    }
}

/// State backed by a fresh [`MemoryStore`], with AI and notifications disabled.
pub fn test_state() -> (AppState, Arc<MemoryStore>) {
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/greenhouse_test".to_string()),
        _ => None,
    })
    .unwrap();
    let store = Arc::new(MemoryStore::default());
    let state = AppState {
        store: store.clone(),
        llm: None,
        scheduler: None,
        config,
    };
    (state, store)
}
