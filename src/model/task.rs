use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single task. Identity is positional: the list owns order, and no
/// reordering operation exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task text (non-empty, trimmed at creation)
    pub text: String,
    /// Completion flag, toggled by the user
    pub completed: bool,
    /// Optional calendar date
    pub date: Option<NaiveDate>,
    /// Optional wall-clock time
    pub time: Option<NaiveTime>,
}

impl Task {
    pub fn new(text: String) -> Self {
        Task {
            text,
            completed: false,
            date: None,
            time: None,
        }
    }

    /// Human-readable schedule string, or None when neither date nor time is
    /// set. Date and time joined as `"<date> @ <time>"` when both present.
    pub fn schedule_label(&self) -> Option<String> {
        match (self.date, self.time) {
            (Some(d), Some(t)) => Some(format!(
                "{} @ {}",
                d.format("%a, %B %-d"),
                t.format("%-I:%M %p")
            )),
            (Some(d), None) => Some(d.format("%a, %B %-d").to_string()),
            (None, Some(t)) => Some(t.format("%-I:%M %p").to_string()),
            (None, None) => None,
        }
    }
}

/// Parse a task date in ISO `yyyy-mm-dd` form.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse a task time in 24-hour `HH:MM` form.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Wire format for one persisted task. Absent date/time are stored as empty
/// strings, not nulls, so the persisted value stays a flat string record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub text: String,
    pub completed: bool,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

impl TaskRecord {
    pub fn from_task(task: &Task) -> Self {
        TaskRecord {
            text: task.text.clone(),
            completed: task.completed,
            date: task
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            time: task
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        }
    }

    /// Convert back into a model task. A date/time string that does not parse
    /// loads as absent; the rest of the record is kept.
    pub fn into_task(self) -> Task {
        Task {
            text: self.text,
            completed: self.completed,
            date: parse_date(&self.date),
            time: parse_time(&self.time),
        }
    }
}

/// Which tasks are visible. Selecting a filter never mutates task data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Display order of the filter controls
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}
