//! Text formatting shared by the view-models

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::Serialize;
use std::fmt;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Reference instant and display offset for rendering timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewContext {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl ViewContext {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Render everything in UTC
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }

    pub fn day_label(&self, instant: DateTime<Utc>) -> DayLabel {
        DayLabel::classify(self.local_date(instant), self.today())
    }

    pub fn time_of_day(&self, instant: DateTime<Utc>) -> String {
        let local = instant.with_timezone(&self.offset);
        format!("{:02}:{:02}", local.hour(), local.minute())
    }

    pub fn relative_time(&self, instant: DateTime<Utc>) -> String {
        relative_time(instant, self.now)
    }
}

/// Call-screen timer, `MM:SS`
pub fn format_call_timer(elapsed_secs: u64) -> String {
    format!("{:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}

/// History duration, `M:SS`; empty when there is nothing to show
pub fn format_history_duration(duration_secs: Option<u64>) -> String {
    match duration_secs {
        Some(secs) if secs > 0 => format!("{}:{:02}", secs / 60, secs % 60),
        _ => String::new(),
    }
}

/// Coarse age of a missed call relative to `now`
pub fn relative_time(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = now.signed_duration_since(instant).num_minutes();
    let hours = minutes / 60;
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if hours < 24 {
        format!("{} h ago", hours)
    } else {
        format!("{} d ago", hours / 24)
    }
}

/// Day bucket used to group the call history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayLabel {
    Today,
    Yesterday,
    DaysAgo { days: i64 },
    Date { day: u32, month: u32, year: Option<i32> },
}

impl DayLabel {
    /// Dates after `today` are treated as today
    pub fn classify(date: NaiveDate, today: NaiveDate) -> Self {
        let days = today.signed_duration_since(date).num_days();
        match days {
            d if d <= 0 => DayLabel::Today,
            1 => DayLabel::Yesterday,
            2..=6 => DayLabel::DaysAgo { days },
            _ => DayLabel::Date {
                day: date.day(),
                month: date.month(),
                year: (date.year() != today.year()).then(|| date.year()),
            },
        }
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayLabel::Today => write!(f, "Today"),
            DayLabel::Yesterday => write!(f, "Yesterday"),
            DayLabel::DaysAgo { days } => write!(f, "{} days ago", days),
            DayLabel::Date { day, month, year } => {
                let name = MONTHS[(*month as usize).saturating_sub(1) % 12];
                match year {
                    Some(year) => write!(f, "{} {} {}", day, name, year),
                    None => write!(f, "{} {}", day, name),
                }
            }
        }
    }
}
