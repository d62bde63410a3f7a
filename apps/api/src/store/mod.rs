//! Persistence seam for applications and users.
//!
//! `AppState` carries an `Arc<dyn TrackerStore>`; production wires [`PgStore`],
//! tests wire an in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{
    Application, ApplicationStatus, ApplicationUpdate, NewApplication, UnknownStatus,
};
use crate::models::user::User;

pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(#[from] UnknownStatus),
}

/// Selection over the application collection. Every `None` field matches all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub user: Option<Uuid>,
    /// Inclusive lower bound on `applied_date`.
    pub applied_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `applied_date`.
    pub applied_to: Option<DateTime<Utc>>,
}

impl ApplicationFilter {
    pub fn with_status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn for_user(user: Uuid) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn applied_between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.applied_from = Some(from);
        self.applied_to = Some(to);
        self
    }

    pub fn matches(&self, application: &Application) -> bool {
        self.status.map_or(true, |s| application.status == s)
            && self.user.map_or(true, |u| application.user == u)
            && self
                .applied_from
                .map_or(true, |from| application.applied_date >= from)
            && self
                .applied_to
                .map_or(true, |to| application.applied_date <= to)
    }
}

#[async_trait]
pub trait TrackerStore: Send + Sync {
    /// All applications, most recently created first.
    async fn list_applications(&self) -> Result<Vec<Application>, StoreError>;

    /// Applications matching `filter`, in creation order.
    async fn find_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, StoreError>;

    async fn create_application(
        &self,
        owner: Uuid,
        new: NewApplication,
    ) -> Result<Application, StoreError>;

    /// Returns `None` when no application has this id.
    async fn update_application(
        &self,
        id: Uuid,
        update: ApplicationUpdate,
    ) -> Result<Option<Application>, StoreError>;

    /// Deleting an unknown id is not an error.
    async fn delete_application(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}
