//! Due-date urgency classification and relative phrasing.
//!
//! Both helpers compare calendar fields (year, month, day) rather than
//! elapsed time. A deadline on the 2nd of next month is *not* "due soon" on
//! the 30th, and "tomorrow" never crosses a month boundary.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days ahead of today (same month) still flagged as due soon.
pub const DUE_SOON_DAYS: u32 = 3;

/// Urgency of a task, derived from its deadline and completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Completed, whatever the deadline
    Done,
    /// No deadline, or not close yet
    Neutral,
    /// Deadline within the next few days of the current month
    DueSoon,
    /// Deadline already passed
    Overdue,
}

impl Urgency {
    /// Marker shown in front of the task title.
    pub fn marker(&self) -> &'static str {
        match self {
            Urgency::Done => "⚫",
            Urgency::Neutral => "⚪",
            Urgency::DueSoon => "🟠",
            Urgency::Overdue => "🔴",
        }
    }
}

/// Classify a task at `now`.
pub fn classify(due: Option<DateTime<Utc>>, completed: bool, now: DateTime<Utc>) -> Urgency {
    if completed {
        return Urgency::Done;
    }
    let Some(due) = due else {
        return Urgency::Neutral;
    };

    if due < now {
        Urgency::Overdue
    } else if due.year() == now.year()
        && due.month() == now.month()
        && due.day() <= now.day() + DUE_SOON_DAYS
    {
        Urgency::DueSoon
    } else {
        Urgency::Neutral
    }
}

/// "today", "tomorrow", "yesterday", or a generic "3 days ago" / "in 2 weeks".
pub fn relative_phrase(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let same_month = due.year() == now.year() && due.month() == now.month();

    if same_month && due.day() == now.day() {
        "today".to_string()
    } else if same_month && due.day() == now.day() + 1 {
        "tomorrow".to_string()
    } else if same_month && due.day() + 1 == now.day() {
        "yesterday".to_string()
    } else {
        humanize(now - due)
    }
}

/// Coarse human wording for a signed delta (positive = in the past).
fn humanize(delta: Duration) -> String {
    let past = delta >= Duration::zero();
    let secs = delta.num_seconds().unsigned_abs();

    if secs < 10 {
        return "just now".to_string();
    }

    let (amount, unit) = match secs {
        s if s < 60 => (s, "second"),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 7 * 86_400 => (s / 86_400, "day"),
        s if s < 30 * 86_400 => (s / (7 * 86_400), "week"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };
    let plural = if amount == 1 { "" } else { "s" };

    if past {
        format!("{amount} {unit}{plural} ago")
    } else {
        format!("in {amount} {unit}{plural}")
    }
}
