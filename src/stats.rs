//! Dashboard derived data: pure functions over the loaded task/event/journal
//! lists and a reference date. All date comparisons are by local calendar day,
//! never by UTC instant, so a `YYYY-MM-DD` value can't shift a day near
//! timezone boundaries.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

use crate::models::{Event, JournalEntry, Mood, Task};

/// Integer encoding of a calendar date (year*10000 + month*100 + day),
/// used for cheap timezone-safe day comparisons.
pub fn day_key(date: NaiveDate) -> i32 {
    date.year() * 10000 + date.month() as i32 * 100 + date.day() as i32
}

/// Parse a stored date or timestamp to a local calendar date.
/// `YYYY-MM-DD` is taken as-is (a local calendar date, not UTC midnight);
/// `YYYY-MM-DD HH:MM:SS` takes its date component.
pub fn parse_local_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .ok()
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Signed whole-day difference `date - reference`
pub fn diff_days(date: NaiveDate, reference: NaiveDate) -> i64 {
    (date - reference).num_days()
}

/// Tasks partitioned into the four status buckets. Each task lands in
/// exactly one bucket, so the counts always sum to the input length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.completed + self.cancelled
    }
}

pub fn status_counts(tasks: &[Task]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for task in tasks {
        match task.status {
            crate::models::TaskStatus::Pending => counts.pending += 1,
            crate::models::TaskStatus::InProgress => counts.in_progress += 1,
            crate::models::TaskStatus::Completed => counts.completed += 1,
            crate::models::TaskStatus::Cancelled => counts.cancelled += 1,
        }
    }
    counts
}

/// Percentage of completed tasks, rounded to the nearest integer.
/// Defined as 0 for an empty list.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

/// How a due date relates to the reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    /// Overdue by n days (n >= 1)
    Late(i64),
    Today,
    /// Due in n days (n >= 1)
    Remaining(i64),
}

impl DueLabel {
    pub fn from_diff(diff: i64) -> Self {
        if diff < 0 {
            DueLabel::Late(-diff)
        } else if diff == 0 {
            DueLabel::Today
        } else {
            DueLabel::Remaining(diff)
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DueLabel::Late(n) => format!("{} days late", n),
            DueLabel::Today => "due today".to_string(),
            DueLabel::Remaining(n) => format!("{} days left", n),
        }
    }
}

/// Label a task's due date relative to `reference`. None when the task has
/// no parseable due date.
pub fn due_label(task: &Task, reference: NaiveDate) -> Option<DueLabel> {
    let due = parse_local_date(task.due_date.as_deref()?)?;
    Some(DueLabel::from_diff(diff_days(due, reference)))
}

/// Non-terminal tasks whose due date falls within 5 days either side of
/// `reference` (inclusive). Captures both recently-overdue and soon-due work.
pub fn urgent_tasks<'a>(tasks: &'a [Task], reference: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| !t.status.is_terminal())
        .filter(|t| {
            t.due_date
                .as_deref()
                .and_then(parse_local_date)
                .map(|due| {
                    let diff = diff_days(due, reference);
                    (-5..=5).contains(&diff)
                })
                .unwrap_or(false)
        })
        .collect()
}

/// Events happening on the reference day
pub fn today_events<'a>(events: &'a [Event], reference: NaiveDate) -> Vec<&'a Event> {
    let today = day_key(reference);
    events
        .iter()
        .filter(|ev| {
            parse_local_date(&ev.event_date)
                .map(|d| day_key(d) == today)
                .unwrap_or(false)
        })
        .collect()
}

/// Events strictly after the reference day, soonest first
pub fn upcoming_events<'a>(events: &'a [Event], reference: NaiveDate) -> Vec<&'a Event> {
    let today = day_key(reference);
    let mut upcoming: Vec<(&Event, i32)> = events
        .iter()
        .filter_map(|ev| {
            let key = day_key(parse_local_date(&ev.event_date)?);
            (key > today).then_some((ev, key))
        })
        .collect();
    upcoming.sort_by_key(|(_, key)| *key);
    upcoming.into_iter().map(|(ev, _)| ev).collect()
}

/// The 5 most recently created tasks, newest first
pub fn recent_tasks<'a>(tasks: &'a [Task]) -> Vec<&'a Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    // created_at is "%Y-%m-%d %H:%M:%S", so lexicographic order is chronological
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(5);
    sorted
}

/// Numeric mood value for trend plotting (higher is better)
pub fn mood_value(mood: Mood) -> u8 {
    match mood {
        Mood::Happy => 4,
        Mood::Grateful => 3,
        Mood::Neutral => 2,
        Mood::Sad => 1,
    }
}

/// Mood values of the last `limit` journal entries, oldest first, paired with
/// the entry's creation date. Used by the dashboard's trend sparkline.
pub fn mood_trend(journals: &[JournalEntry], limit: usize) -> Vec<(String, u8)> {
    let mut sorted: Vec<&JournalEntry> = journals.iter().collect();
    sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let start = sorted.len().saturating_sub(limit);
    sorted[start..]
        .iter()
        .map(|j| (j.created_at.clone(), mood_value(j.mood)))
        .collect()
}

/// Total whitespace-separated words across all journal contents
pub fn total_words(journals: &[JournalEntry]) -> usize {
    journals
        .iter()
        .filter_map(|j| j.content.as_deref())
        .map(|c| c.split_whitespace().count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn task(title: &str, status: TaskStatus, due: Option<&str>) -> Task {
        let mut t = Task::new(title.to_string());
        t.status = status;
        t.due_date = due.map(|d| d.to_string());
        t
    }

    fn event(title: &str, date: &str) -> Event {
        Event::new(title.to_string(), date.to_string())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn date_string_parses_as_local_calendar_day() {
        // Must be March 1 regardless of the runtime's UTC offset: the string
        // is a calendar date, not an instant.
        let d = parse_local_date("2024-03-01").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 3, 1));
        assert_eq!(day_key(d), 20240301);
    }

    #[test]
    fn timestamp_parses_to_its_date_component() {
        let d = parse_local_date("2024-03-01 23:59:59").unwrap();
        assert_eq!(day_key(d), 20240301);
        assert!(parse_local_date("not a date").is_none());
    }

    #[test]
    fn bucket_counts_sum_to_list_length() {
        let tasks = vec![
            task("a", TaskStatus::Pending, None),
            task("b", TaskStatus::Pending, None),
            task("c", TaskStatus::InProgress, None),
            task("d", TaskStatus::Completed, None),
            task("e", TaskStatus::Cancelled, None),
        ];
        let counts = status_counts(&tasks);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.total(), tasks.len());
    }

    #[test]
    fn completion_rate_handles_empty_and_rounds() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 4), 25);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(3, 3), 100);
    }

    #[test]
    fn due_today_is_labeled_today_not_late_or_remaining() {
        let reference = date("2024-03-01");
        let t = task("due today", TaskStatus::Pending, Some("2024-03-01"));
        assert_eq!(due_label(&t, reference), Some(DueLabel::Today));

        let late = task("late", TaskStatus::Pending, Some("2024-02-27"));
        assert_eq!(due_label(&late, reference), Some(DueLabel::Late(3)));

        let ahead = task("ahead", TaskStatus::Pending, Some("2024-03-04"));
        assert_eq!(due_label(&ahead, reference), Some(DueLabel::Remaining(3)));
    }

    #[test]
    fn urgency_window_is_inclusive_five_days_either_side() {
        let reference = date("2024-03-10");
        let tasks = vec![
            task("six days late", TaskStatus::Pending, Some("2024-03-04")),
            task("five days late", TaskStatus::Pending, Some("2024-03-05")),
            task("today", TaskStatus::Pending, Some("2024-03-10")),
            task("five ahead", TaskStatus::Pending, Some("2024-03-15")),
            task("six ahead", TaskStatus::Pending, Some("2024-03-16")),
            task("done", TaskStatus::Completed, Some("2024-03-10")),
            task("cancelled", TaskStatus::Cancelled, Some("2024-03-10")),
            task("no due date", TaskStatus::Pending, None),
        ];
        let urgent: Vec<&str> = urgent_tasks(&tasks, reference)
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(urgent, vec!["five days late", "today", "five ahead"]);
    }

    #[test]
    fn upcoming_excludes_today_and_sorts_ascending() {
        let reference = date("2024-03-10");
        let events = vec![
            event("today", "2024-03-10"),
            event("next week", "2024-03-17"),
            event("tomorrow", "2024-03-11"),
            event("past", "2024-03-01"),
        ];

        let today: Vec<&str> = today_events(&events, reference)
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(today, vec!["today"]);

        let upcoming: Vec<&str> = upcoming_events(&events, reference)
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(upcoming, vec!["tomorrow", "next week"]);
    }

    #[test]
    fn recent_tasks_takes_top_five_newest_first() {
        let mut tasks = Vec::new();
        for i in 1..=7 {
            let mut t = task(&format!("t{}", i), TaskStatus::Pending, None);
            t.created_at = format!("2024-03-{:02} 08:00:00", i);
            tasks.push(t);
        }
        let recent: Vec<&str> = recent_tasks(&tasks).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(recent, vec!["t7", "t6", "t5", "t4", "t3"]);
    }

    #[test]
    fn empty_inputs_degrade_to_zero_aggregates() {
        let no_tasks: Vec<Task> = Vec::new();
        let no_events: Vec<Event> = Vec::new();
        let no_journals: Vec<JournalEntry> = Vec::new();
        let reference = date("2024-03-10");

        assert_eq!(status_counts(&no_tasks).total(), 0);
        assert!(urgent_tasks(&no_tasks, reference).is_empty());
        assert!(today_events(&no_events, reference).is_empty());
        assert!(upcoming_events(&no_events, reference).is_empty());
        assert!(recent_tasks(&no_tasks).is_empty());
        assert!(mood_trend(&no_journals, 14).is_empty());
        assert_eq!(total_words(&no_journals), 0);
    }

    #[test]
    fn mood_trend_takes_last_entries_oldest_first() {
        let mut journals = Vec::new();
        let moods = [Mood::Sad, Mood::Neutral, Mood::Grateful, Mood::Happy];
        for (i, mood) in moods.iter().enumerate() {
            let mut j = JournalEntry::new(format!("j{}", i));
            j.mood = *mood;
            j.created_at = format!("2024-03-{:02} 08:00:00", i + 1);
            journals.push(j);
        }

        let trend = mood_trend(&journals, 2);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].1, mood_value(Mood::Grateful));
        assert_eq!(trend[1].1, mood_value(Mood::Happy));
    }

    #[test]
    fn total_words_counts_whitespace_separated() {
        let mut a = JournalEntry::new("a".to_string());
        a.content = Some("three word entry".to_string());
        let mut b = JournalEntry::new("b".to_string());
        b.content = Some("two  words".to_string());
        let c = JournalEntry::new("c".to_string()); // no content

        assert_eq!(total_words(&[a, b, c]), 5);
    }
}
