use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::models::application::{Application, ApplicationStatus};

/// Status counts for one calendar month of `applied_date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyTrend {
    /// e.g. `Oct 2026`
    pub month: String,
    #[serde(rename = "Applied")]
    pub applied: usize,
    #[serde(rename = "Interview")]
    pub interview: usize,
    #[serde(rename = "Offer")]
    pub offer: usize,
    #[serde(rename = "Rejected")]
    pub rejected: usize,
    #[serde(rename = "Withdrawn", skip_serializing_if = "is_zero")]
    pub withdrawn: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl MonthlyTrend {
    fn record(&mut self, status: ApplicationStatus) {
        let slot = match status {
            ApplicationStatus::Applied => &mut self.applied,
            ApplicationStatus::Interview => &mut self.interview,
            ApplicationStatus::Offer => &mut self.offer,
            ApplicationStatus::Rejected => &mut self.rejected,
            ApplicationStatus::Withdrawn => &mut self.withdrawn,
        };
        *slot += 1;
    }
}

/// One record per month that has applications, oldest month first.
pub fn monthly_trends(applications: &[Application]) -> Vec<MonthlyTrend> {
    let mut months: BTreeMap<(i32, u32), MonthlyTrend> = BTreeMap::new();

    for app in applications {
        let applied = app.applied_date;
        months
            .entry((applied.year(), applied.month()))
            .or_insert_with(|| MonthlyTrend {
                month: applied.format("%b %Y").to_string(),
                ..MonthlyTrend::default()
            })
            .record(app.status);
    }

    months.into_values().collect()
}
