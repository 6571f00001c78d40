use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::database::Database;
use crate::database::DatabaseError;
use crate::models::{Event, EventCategory, JournalEntry, Mood, Task, TaskStatus};
use crate::stats;
use crate::utils::{get_current_date_string, parse_date};

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Tasks, events, journal and a focus timer - a local-first terminal app")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Quickly add a new task
    AddTask {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Initial status (pending, in_progress, completed, cancelled)
        #[arg(long)]
        status: Option<String>,
    },
    /// Quickly add a new event
    AddEvent {
        /// Event title
        title: String,
        /// Event date (YYYY-MM-DD)
        date: String,
        /// Category (meeting, deadline, personal)
        #[arg(long)]
        category: Option<String>,
    },
    /// Quickly add a new journal entry
    AddJournal {
        /// Journal title
        title: String,
        /// Journal content
        #[arg(long)]
        content: Option<String>,
        /// Mood (happy, sad, neutral, grateful)
        #[arg(long)]
        mood: Option<String>,
    },
    /// Print today's dashboard summary
    Summary,
    /// Dump all data as JSON to stdout
    Export,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Failed to serialize export: {0}")]
    ExportError(#[from] serde_json::Error),
}

/// Handle the add-task command
pub fn handle_add_task(
    title: String,
    due: Option<String>,
    status: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    // Parse due date if provided
    let due_date = if let Some(due_str) = due {
        parse_date(&due_str)
            .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", due_str, e)))?;
        Some(due_str)
    } else {
        None
    };

    let mut task = Task::new(title);
    task.due_date = due_date;
    if let Some(status_str) = status {
        task.status = TaskStatus::parse(&status_str);
    }

    let id = db.insert_task(&task)?;
    println!("Task created successfully (ID: {})", id);

    Ok(())
}

/// Handle the add-event command
pub fn handle_add_event(
    title: String,
    date: String,
    category: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    parse_date(&date)
        .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", date, e)))?;

    let mut event = Event::new(title, date);
    if let Some(category_str) = category {
        event.category = EventCategory::parse(&category_str);
    }

    let id = db.insert_event(&event)?;
    println!("Event created successfully (ID: {})", id);

    Ok(())
}

/// Handle the add-journal command
pub fn handle_add_journal(
    title: String,
    content: Option<String>,
    mood: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    let mut journal = JournalEntry::new(title);
    journal.content = content;
    if let Some(mood_str) = mood {
        journal.mood = Mood::parse(&mood_str);
    }

    let id = db.insert_journal(&journal)?;
    println!("Journal entry created successfully (ID: {})", id);

    Ok(())
}

/// Handle the summary command: the dashboard numbers, printed once
pub fn handle_summary(db: &Database) -> Result<(), CliError> {
    let tasks = db.get_all_tasks()?;
    let events = db.get_all_events()?;
    let today = stats::today();

    let counts = stats::status_counts(&tasks);
    let rate = stats::completion_rate(counts.completed, counts.total());

    println!("Tasks: {} total", counts.total());
    println!("  pending:     {}", counts.pending);
    println!("  in progress: {}", counts.in_progress);
    println!("  completed:   {}", counts.completed);
    println!("  cancelled:   {}", counts.cancelled);
    println!("Completion rate: {}%", rate);

    let urgent = stats::urgent_tasks(&tasks, today);
    if !urgent.is_empty() {
        println!("\nNeeds attention:");
        for task in urgent {
            let label = stats::due_label(task, today)
                .map(|l| l.describe())
                .unwrap_or_default();
            println!("  {} ({})", task.title, label);
        }
    }

    let todays = stats::today_events(&events, today);
    if !todays.is_empty() {
        println!("\nToday's events:");
        for event in todays {
            println!("  {} [{}]", event.title, event.category.as_str());
        }
    }

    let (sessions, minutes) = db.daily_session_stats(&get_current_date_string())?;
    println!("\nFocus today: {} sessions, {} minutes", sessions, minutes);

    Ok(())
}

/// Handle the export command: everything, as one JSON document on stdout
pub fn handle_export(db: &Database) -> Result<(), CliError> {
    let export = serde_json::json!({
        "tasks": db.get_all_tasks()?,
        "events": db.get_all_events()?,
        "journals": db.get_all_journals()?,
        "focus_sessions": db.get_all_sessions()?,
    });
    println!("{}", serde_json::to_string_pretty(&export)?);

    Ok(())
}
