use serde::{Deserialize, Serialize};

/// Task lifecycle status. Unknown strings from older databases fall back to Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "in_progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "cancelled" => TaskStatus::Cancelled,
            _ => TaskStatus::Pending,
        }
    }

    /// True for statuses that end the task's lifecycle (excluded from urgency).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }

    /// Cycle order used by the status toggle key in the task list.
    pub fn next(&self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Cancelled,
            TaskStatus::Cancelled => TaskStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Meeting,
    Deadline,
    Personal,
    Uncategorized,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Meeting => "meeting",
            EventCategory::Deadline => "deadline",
            EventCategory::Personal => "personal",
            EventCategory::Uncategorized => "uncategorized",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "meeting" => EventCategory::Meeting,
            "deadline" => EventCategory::Deadline,
            "personal" => EventCategory::Personal,
            _ => EventCategory::Uncategorized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
    Grateful,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
            Mood::Grateful => "grateful",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "happy" => Mood::Happy,
            "sad" => Mood::Sad,
            "grateful" => Mood::Grateful,
            _ => Mood::Neutral,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<String>, // ISO 8601: YYYY-MM-DD
    pub notes: Option<String>,    // scratchpad draft associated with this task
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub event_date: String, // YYYY-MM-DD
    pub category: EventCategory,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Option<i64>,
    pub title: String,
    pub content: Option<String>,
    pub mood: Mood,
    pub created_at: String,
    pub updated_at: String,
}

/// One completed focus interval. Append-only; never edited after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: Option<i64>,
    pub task_id: Option<i64>,
    pub duration_minutes: i64,
    pub completed_at: String,
}

// Timestamps use local time so that day-keyed statistics (today's sessions,
// recent activity) line up with the user's calendar day.
pub fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl Task {
    pub fn new(title: String) -> Self {
        let now = now_timestamp();
        Self {
            id: None,
            title,
            description: None,
            status: TaskStatus::Pending,
            due_date: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl Event {
    pub fn new(title: String, event_date: String) -> Self {
        let now = now_timestamp();
        Self {
            id: None,
            title,
            description: None,
            event_date,
            category: EventCategory::Uncategorized,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl JournalEntry {
    pub fn new(title: String) -> Self {
        let now = now_timestamp();
        Self {
            id: None,
            title,
            content: None,
            mood: Mood::Neutral,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl FocusSession {
    pub fn new(duration_minutes: i64, task_id: Option<i64>) -> Self {
        Self {
            id: None,
            task_id,
            duration_minutes,
            completed_at: now_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_strings_use_safe_defaults() {
        assert_eq!(TaskStatus::parse("todo"), TaskStatus::Pending);
        assert_eq!(EventCategory::parse(""), EventCategory::Uncategorized);
        assert_eq!(Mood::parse("ecstatic"), Mood::Neutral);
    }

    #[test]
    fn status_cycle_visits_all_states() {
        let mut status = TaskStatus::Pending;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(status);
            status = status.next();
        }
        assert_eq!(status, TaskStatus::Pending);
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn terminal_statuses() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
    }
}
