//! HTML bodies for notification emails.

use chrono::Local;

use crate::models::application::Application;
use crate::notifications::passes::WeeklyStats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn follow_up_reminder(application: &Application) -> EmailContent {
    let company = escape_html(&application.company);
    let position = escape_html(&application.position);
    let applied = application
        .applied_date
        .with_timezone(&Local)
        .format("%-m/%-d/%Y");

    EmailContent {
        subject: format!(
            "Follow up: {} at {}",
            application.position, application.company
        ),
        html: format!(
            "<h2>Time to Follow Up!</h2>\
             <p>Don't forget to follow up on your application:</p>\
             <ul>\
             <li><strong>Company:</strong> {company}</li>\
             <li><strong>Position:</strong> {position}</li>\
             <li><strong>Applied:</strong> {applied}</li>\
             </ul>\
             <p>Good luck!</p>"
        ),
    }
}

pub fn interview_reminder(application: &Application) -> EmailContent {
    let company = escape_html(&application.company);
    let position = escape_html(&application.position);

    let link = application
        .job_url
        .as_deref()
        .map(|url| {
            let url = escape_html(url);
            format!("<p><a href=\"{url}\">View the job posting</a></p>")
        })
        .unwrap_or_default();

    EmailContent {
        subject: format!(
            "Interview reminder: {} at {}",
            application.position, application.company
        ),
        html: format!(
            "<h2>Interview Coming Up</h2>\
             <p>You have an interview in progress for <strong>{position}</strong> \
             at <strong>{company}</strong>.</p>\
             <p>Review the job description, prepare your questions, and research the team.</p>\
             {link}"
        ),
    }
}

pub fn weekly_summary(stats: &WeeklyStats) -> EmailContent {
    EmailContent {
        subject: "Your weekly job search summary".to_string(),
        html: format!(
            "<h2>Your Week in Review</h2>\
             <ul>\
             <li><strong>Applications this week:</strong> {}</li>\
             <li><strong>Total applications:</strong> {}</li>\
             <li><strong>Interviews:</strong> {}</li>\
             <li><strong>Offers:</strong> {}</li>\
             </ul>\
             <p>Keep going!</p>",
            stats.this_week, stats.total_applications, stats.interviews, stats.offers
        ),
    }
}
