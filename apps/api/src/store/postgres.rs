use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationRow, ApplicationUpdate, NewApplication};
use crate::models::user::User;
use crate::store::{ApplicationFilter, StoreError, TrackerStore};

/// `TrackerStore` backed by the `applications` and `users` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_applications(rows: Vec<ApplicationRow>) -> Result<Vec<Application>, StoreError> {
    rows.into_iter()
        .map(|row| Application::try_from(row).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl TrackerStore for PgStore {
    async fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        into_applications(rows)
    }

    async fn find_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT * FROM applications
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
              AND ($3::timestamptz IS NULL OR applied_date >= $3)
              AND ($4::timestamptz IS NULL OR applied_date <= $4)
            ORDER BY created_at ASC
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.user)
        .bind(filter.applied_from)
        .bind(filter.applied_to)
        .fetch_all(&self.pool)
        .await?;

        into_applications(rows)
    }

    async fn create_application(
        &self,
        owner: Uuid,
        new: NewApplication,
    ) -> Result<Application, StoreError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications
                (user_id, company, position, status, salary, location, job_url,
                 description, notes, applied_date, follow_up_date, resume_used, cover_letter)
            VALUES ($1, $2, $3, COALESCE($4, 'Applied'), $5, $6, $7, $8, $9,
                    COALESCE($10, NOW()), $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(new.user.unwrap_or(owner))
        .bind(new.company.trim())
        .bind(new.position.trim())
        .bind(new.status.map(|s| s.as_str()))
        .bind(new.salary)
        .bind(new.location)
        .bind(new.job_url)
        .bind(new.description)
        .bind(new.notes)
        .bind(new.applied_date)
        .bind(new.follow_up_date)
        .bind(new.resume_used)
        .bind(new.cover_letter)
        .fetch_one(&self.pool)
        .await?;

        Ok(Application::try_from(row)?)
    }

    async fn update_application(
        &self,
        id: Uuid,
        update: ApplicationUpdate,
    ) -> Result<Option<Application>, StoreError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications SET
                user_id        = COALESCE($2, user_id),
                company        = COALESCE($3, company),
                position       = COALESCE($4, position),
                status         = COALESCE($5, status),
                salary         = COALESCE($6, salary),
                location       = COALESCE($7, location),
                job_url        = COALESCE($8, job_url),
                description    = COALESCE($9, description),
                notes          = COALESCE($10, notes),
                applied_date   = COALESCE($11, applied_date),
                follow_up_date = COALESCE($12, follow_up_date),
                resume_used    = COALESCE($13, resume_used),
                cover_letter   = COALESCE($14, cover_letter),
                updated_at     = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.user)
        .bind(update.company)
        .bind(update.position)
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.salary)
        .bind(update.location)
        .bind(update.job_url)
        .bind(update.description)
        .bind(update.notes)
        .bind(update.applied_date)
        .bind(update.follow_up_date)
        .bind(update.resume_used)
        .bind(update.cover_letter)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Application::try_from)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn delete_application(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
