use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Where an application currently stands. Any status may follow any other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Raw `applications` row. `status` is TEXT in the schema and is checked on conversion.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: String,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub applied_date: DateTime<Utc>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub resume_used: Option<String>,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tracked job application as served over the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub applied_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = UnknownStatus;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            user: row.user_id,
            company: row.company,
            position: row.position,
            status: row.status.parse()?,
            salary: row.salary,
            location: row.location,
            job_url: row.job_url,
            description: row.description,
            notes: row.notes,
            applied_date: row.applied_date,
            follow_up_date: row.follow_up_date,
            resume_used: row.resume_used,
            cover_letter: row.cover_letter,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Body of `POST /api/applications`. Missing `company`/`position` deserialize
/// as empty strings so the handler can report them together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewApplication {
    pub user: Option<Uuid>,
    pub company: String,
    pub position: String,
    pub status: Option<ApplicationStatus>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub applied_date: Option<DateTime<Utc>>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub resume_used: Option<String>,
    pub cover_letter: Option<String>,
}

impl NewApplication {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.company.trim().is_empty() {
            missing.push("company");
        }
        if self.position.trim().is_empty() {
            missing.push("position");
        }
        missing
    }
}

/// Body of `PUT /api/applications/:id`. Absent fields keep their stored value.
///
/// `null` reads the same as absent, so an update never clears an optional
/// field; this matches the `COALESCE` update in `PgStore`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationUpdate {
    pub user: Option<Uuid>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub applied_date: Option<DateTime<Utc>>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub resume_used: Option<String>,
    pub cover_letter: Option<String>,
}

impl ApplicationUpdate {
    /// Merges the provided fields into `application`, mirroring the SQL `COALESCE` update.
    pub fn apply_to(self, application: &mut Application) {
        fn merge<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        fn merge_opt<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        merge(&mut application.user, self.user);
        merge(&mut application.company, self.company);
        merge(&mut application.position, self.position);
        merge(&mut application.status, self.status);
        merge_opt(&mut application.salary, self.salary);
        merge_opt(&mut application.location, self.location);
        merge_opt(&mut application.job_url, self.job_url);
        merge_opt(&mut application.description, self.description);
        merge_opt(&mut application.notes, self.notes);
        merge(&mut application.applied_date, self.applied_date);
        merge_opt(&mut application.follow_up_date, self.follow_up_date);
        merge_opt(&mut application.resume_used, self.resume_used);
        merge_opt(&mut application.cover_letter, self.cover_letter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(status: &str) -> ApplicationRow {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
        ApplicationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            status: status.to_string(),
            salary: None,
            location: Some("Remote".to_string()),
            job_url: None,
            description: None,
            notes: None,
            applied_date: at,
            follow_up_date: None,
            resume_used: None,
            cover_letter: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_status_parses_every_variant() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown_and_lowercase() {
        assert!("Ghosted".parse::<ApplicationStatus>().is_err());
        assert!("applied".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_status_defaults_to_applied() {
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Applied);
    }

    #[test]
    fn test_row_with_bad_status_fails_conversion() {
        let err = Application::try_from(row("Pending")).unwrap_err();
        assert_eq!(err.0, "Pending");
    }

    #[test]
    fn test_application_serializes_camel_case_with_mongo_style_id() {
        let application = Application::try_from(row("Interview")).unwrap();
        let json = serde_json::to_value(&application).unwrap();
        assert_eq!(json["_id"], application.id.to_string());
        assert_eq!(json["status"], "Interview");
        assert_eq!(json["location"], "Remote");
        assert!(json.get("appliedDate").is_some());
        assert!(json.get("salary").is_none(), "unset optionals are omitted");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_new_application_reports_blank_required_fields() {
        let body: NewApplication = serde_json::from_str(r#"{"company": "  "}"#).unwrap();
        assert_eq!(body.missing_fields(), vec!["company", "position"]);

        let body: NewApplication =
            serde_json::from_str(r#"{"company": "Acme", "position": "SRE", "jobUrl": "x"}"#)
                .unwrap();
        assert!(body.missing_fields().is_empty());
        assert_eq!(body.job_url.as_deref(), Some("x"));
    }

    #[test]
    fn test_update_merges_only_provided_fields() {
        let mut application = Application::try_from(row("Applied")).unwrap();
        let update: ApplicationUpdate =
            serde_json::from_str(r#"{"status": "Offer", "notes": "call back"}"#).unwrap();
        update.apply_to(&mut application);

        assert_eq!(application.status, ApplicationStatus::Offer);
        assert_eq!(application.notes.as_deref(), Some("call back"));
        assert_eq!(application.company, "Acme");
        assert_eq!(application.location.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_update_with_null_keeps_stored_optional_values() {
        let mut application = Application::try_from(row("Applied")).unwrap();
        application.notes = Some("recruiter call".to_string());
        let update: ApplicationUpdate =
            serde_json::from_str(r#"{"notes": null, "location": null}"#).unwrap();
        update.apply_to(&mut application);

        assert_eq!(application.notes.as_deref(), Some("recruiter call"));
        assert_eq!(application.location.as_deref(), Some("Remote"));
    }
}
