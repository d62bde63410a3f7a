//! Dashboard overview: status counts, the six-month timeline and top companies.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::Serialize;

use crate::models::application::{Application, ApplicationStatus};

const TIMELINE_MONTHS: u32 = 6;
const TOP_COMPANIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub interviews: usize,
    pub offers: usize,
    pub rejected: usize,
    /// Percentages with one decimal, `"0"` when there are no applications.
    pub interview_rate: String,
    pub offer_rate: String,
    pub rejection_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// `M/D/YYYY`
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyCount {
    pub company: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub stats: Stats,
    pub status_data: BTreeMap<ApplicationStatus, usize>,
    pub timeline_data: Vec<TimelinePoint>,
    pub company_data: Vec<CompanyCount>,
}

pub fn compute_overview(applications: &[Application], now: DateTime<Utc>) -> Overview {
    Overview {
        stats: compute_stats(applications),
        status_data: status_distribution(applications),
        timeline_data: timeline(applications, now),
        company_data: top_companies(applications),
    }
}

pub fn status_distribution(applications: &[Application]) -> BTreeMap<ApplicationStatus, usize> {
    let mut counts = BTreeMap::new();
    for app in applications {
        *counts.entry(app.status).or_insert(0) += 1;
    }
    counts
}

/// Daily counts of applications submitted in the trailing six months, oldest day first.
pub fn timeline(applications: &[Application], now: DateTime<Utc>) -> Vec<TimelinePoint> {
    let cutoff = now
        .checked_sub_months(Months::new(TIMELINE_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for app in applications.iter().filter(|a| a.applied_date >= cutoff) {
        *per_day.entry(app.applied_date.date_naive()).or_insert(0) += 1;
    }

    per_day
        .into_iter()
        .map(|(day, count)| TimelinePoint {
            date: day.format("%-m/%-d/%Y").to_string(),
            count,
        })
        .collect()
}

/// Per-company counts, highest first, capped at ten. Equal counts keep first-seen order.
pub fn top_companies(applications: &[Application]) -> Vec<CompanyCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut companies: Vec<CompanyCount> = Vec::new();

    for app in applications {
        match index.get(app.company.as_str()) {
            Some(&i) => companies[i].count += 1,
            None => {
                index.insert(&app.company, companies.len());
                companies.push(CompanyCount {
                    company: app.company.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, which keeps ties in insertion order
    companies.sort_by(|a, b| b.count.cmp(&a.count));
    companies.truncate(TOP_COMPANIES);
    companies
}

pub fn compute_stats(applications: &[Application]) -> Stats {
    let count = |status: ApplicationStatus| {
        applications
            .iter()
            .filter(|a| a.status == status)
            .count()
    };

    let total = applications.len();
    let interviews = count(ApplicationStatus::Interview);
    let offers = count(ApplicationStatus::Offer);
    let rejected = count(ApplicationStatus::Rejected);

    Stats {
        total,
        interviews,
        offers,
        rejected,
        interview_rate: rate(interviews, total),
        offer_rate: rate(offers, total),
        rejection_rate: rate(rejected, total),
    }
}

fn rate(part: usize, total: usize) -> String {
    if total == 0 {
        return "0".to_string();
    }
    format!("{:.1}", part as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::application;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn apps(rows: &[(&str, ApplicationStatus, i64)]) -> Vec<Application> {
        rows.iter()
            .map(|(company, status, days_ago)| {
                application(company, *status, now() - Duration::days(*days_ago))
            })
            .collect()
    }

    #[test]
    fn test_empty_collection_reports_zero_rates() {
        let overview = compute_overview(&[], now());
        assert_eq!(overview.stats.total, 0);
        assert_eq!(overview.stats.interview_rate, "0");
        assert_eq!(overview.stats.offer_rate, "0");
        assert_eq!(overview.stats.rejection_rate, "0");
        assert!(overview.status_data.is_empty());
        assert!(overview.timeline_data.is_empty());
        assert!(overview.company_data.is_empty());

        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["stats"]["interviewRate"], "0");
    }

    #[test]
    fn test_status_counts_sum_to_total() {
        use ApplicationStatus::*;
        let applications = apps(&[
            ("A", Applied, 1),
            ("B", Interview, 2),
            ("C", Interview, 3),
            ("D", Offer, 4),
            ("E", Rejected, 5),
            ("F", Withdrawn, 6),
            ("G", Applied, 400),
        ]);
        let overview = compute_overview(&applications, now());

        let sum: usize = overview.status_data.values().sum();
        assert_eq!(sum, overview.stats.total);
        assert_eq!(overview.status_data[&Interview], 2);
        assert_eq!(overview.status_data[&Applied], 2);
    }

    #[test]
    fn test_rates_are_independent_of_each_other() {
        use ApplicationStatus::*;
        let applications = apps(&[
            ("A", Applied, 1),
            ("B", Interview, 1),
            ("C", Offer, 1),
            ("D", Withdrawn, 1),
            ("E", Withdrawn, 1),
            ("F", Applied, 1),
        ]);
        let stats = compute_stats(&applications);

        assert_eq!(stats.interview_rate, "16.7");
        assert_eq!(stats.offer_rate, "16.7");
        assert_eq!(stats.rejection_rate, "0.0");
        let sum: f64 = [&stats.interview_rate, &stats.offer_rate, &stats.rejection_rate]
            .iter()
            .map(|r| r.parse::<f64>().unwrap())
            .sum();
        assert!(sum < 100.0);
    }

    #[test]
    fn test_rate_rounds_to_one_decimal() {
        assert_eq!(rate(1, 3), "33.3");
        assert_eq!(rate(2, 3), "66.7");
        assert_eq!(rate(3, 3), "100.0");
    }

    #[test]
    fn test_timeline_excludes_applications_older_than_six_months() {
        use ApplicationStatus::*;
        let applications = vec![
            application("Old", Applied, Utc.with_ymd_and_hms(2026, 4, 17, 12, 0, 0).unwrap()),
            application("Edge", Applied, Utc.with_ymd_and_hms(2026, 4, 18, 12, 0, 0).unwrap()),
            application("New", Applied, Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap()),
        ];
        let points = timeline(&applications, now());

        assert_eq!(
            points,
            vec![
                TimelinePoint {
                    date: "4/18/2026".to_string(),
                    count: 1
                },
                TimelinePoint {
                    date: "10/1/2026".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_timeline_buckets_by_day_in_calendar_order() {
        use ApplicationStatus::*;
        // Inserted out of order; buckets come back in calendar order, not string order.
        let applications = vec![
            application("A", Applied, Utc.with_ymd_and_hms(2026, 10, 2, 8, 0, 0).unwrap()),
            application("B", Offer, Utc.with_ymd_and_hms(2026, 9, 30, 8, 0, 0).unwrap()),
            application("C", Applied, Utc.with_ymd_and_hms(2026, 10, 2, 20, 0, 0).unwrap()),
        ];
        let points = timeline(&applications, now());

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, "9/30/2026");
        assert_eq!(points[1].date, "10/2/2026");
        assert_eq!(points[1].count, 2);
    }

    #[test]
    fn test_top_companies_sorted_and_capped() {
        let mut applications = Vec::new();
        for i in 0..12 {
            let name = format!("Company {i}");
            for _ in 0..=i {
                applications.push(application(&name, ApplicationStatus::Applied, now()));
            }
        }
        let companies = top_companies(&applications);

        assert_eq!(companies.len(), 10);
        assert_eq!(companies[0].company, "Company 11");
        assert_eq!(companies[0].count, 12);
        assert!(companies.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_top_companies_ties_keep_first_seen_order() {
        use ApplicationStatus::*;
        let applications = apps(&[
            ("Zeta", Applied, 1),
            ("Alpha", Applied, 1),
            ("Mid", Applied, 1),
            ("Alpha", Interview, 2),
            ("Mid", Rejected, 3),
            ("Zeta", Offer, 4),
        ]);
        let names: Vec<_> = top_companies(&applications)
            .into_iter()
            .map(|c| c.company)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }
}
