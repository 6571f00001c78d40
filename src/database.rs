use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Event, EventCategory, FocusSession, JournalEntry, Mood, Task, TaskStatus};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Missing row id for update")]
    MissingId,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;

        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                description     TEXT,
                status          TEXT DEFAULT 'pending',
                due_date        TEXT,
                notes           TEXT,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                description     TEXT,
                event_date      TEXT NOT NULL,
                category        TEXT DEFAULT 'uncategorized',
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS journals (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                content         TEXT,
                mood            TEXT DEFAULT 'neutral',
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;

        // Append-only focus session log. task_id is a soft reference: deleting
        // a task keeps its sessions so daily totals stay accurate.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS focus_sessions (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id          INTEGER,
                duration_minutes INTEGER NOT NULL,
                completed_at     TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_events_event_date ON events(event_date)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_journals_created_at ON journals(created_at)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_focus_sessions_completed_at ON focus_sessions(completed_at)",
            [],
        )?;

        // Migrate databases created before the scratchpad gained task drafts
        self.migrate_add_task_notes()?;

        Ok(())
    }

    /// Add the tasks.notes column to existing databases that predate it
    fn migrate_add_task_notes(&self) -> Result<(), DatabaseError> {
        fn column_exists(
            conn: &Connection,
            table: &str,
            column: &str,
        ) -> Result<bool, DatabaseError> {
            let mut stmt =
                conn.prepare("SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2")?;
            let count: i64 = stmt.query_row(rusqlite::params![table, column], |row| row.get(0))?;
            Ok(count > 0)
        }

        if !column_exists(&self.conn, "tasks", "notes")? {
            self.conn
                .execute("ALTER TABLE tasks ADD COLUMN notes TEXT", [])?;
        }

        Ok(())
    }

    // ---- tasks ----

    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        let status: String = row.get(3)?;
        Ok(Task {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            description: row.get(2)?,
            status: TaskStatus::parse(&status),
            due_date: row.get(4)?,
            notes: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    /// Insert a task and return its ID
    pub fn insert_task(&self, task: &Task) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (title, description, status, due_date, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                task.title,
                task.description,
                task.status.as_str(),
                task.due_date,
                task.notes,
                task.created_at,
                task.updated_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all tasks, newest first (matches the dashboard's recent-activity order)
    pub fn get_all_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, status, due_date, notes, created_at, updated_at
             FROM tasks ORDER BY created_at DESC, id DESC",
        )?;
        let tasks = stmt
            .query_map([], Self::row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Get a single task by ID
    pub fn get_task(&self, id: i64) -> Result<Task, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, status, due_date, notes, created_at, updated_at
             FROM tasks WHERE id = ?1",
        )?;
        stmt.query_row(rusqlite::params![id], Self::row_to_task)
            .map_err(DatabaseError::from)
    }

    /// Update an existing task
    pub fn update_task(&self, task: &Task) -> Result<(), DatabaseError> {
        let id = task.id.ok_or(DatabaseError::MissingId)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE tasks SET title = ?1, description = ?2, status = ?3,
             due_date = ?4, notes = ?5, updated_at = ?6 WHERE id = ?7",
            rusqlite::params![
                task.title,
                task.description,
                task.status.as_str(),
                task.due_date,
                task.notes,
                task.updated_at,
                id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Update only a task's status (used by the status-cycle key)
    pub fn update_task_status(&self, id: i64, status: TaskStatus) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![status.as_str(), crate::models::now_timestamp(), id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Replace the scratchpad draft stored on a task
    pub fn update_task_notes(&self, id: i64, notes: &str) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE tasks SET notes = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![notes, crate::models::now_timestamp(), id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Load the scratchpad draft stored on a task (empty string if none)
    pub fn get_task_notes(&self, id: i64) -> Result<String, DatabaseError> {
        let notes: Option<String> = self.conn.query_row(
            "SELECT notes FROM tasks WHERE id = ?1",
            rusqlite::params![id],
            |row| row.get(0),
        )?;
        Ok(notes.unwrap_or_default())
    }

    /// Delete a task by ID. Focus sessions referencing it are kept.
    pub fn delete_task(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(())
    }

    // ---- events ----

    fn row_to_event(row: &rusqlite::Row) -> Result<Event, rusqlite::Error> {
        let category: String = row.get(4)?;
        Ok(Event {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            description: row.get(2)?,
            event_date: row.get(3)?,
            category: EventCategory::parse(&category),
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    /// Insert an event and return its ID
    pub fn insert_event(&self, event: &Event) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO events (title, description, event_date, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                event.title,
                event.description,
                event.event_date,
                event.category.as_str(),
                event.created_at,
                event.updated_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all events ordered by date ASC (soonest first)
    pub fn get_all_events(&self) -> Result<Vec<Event>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, event_date, category, created_at, updated_at
             FROM events ORDER BY event_date ASC, id ASC",
        )?;
        let events = stmt
            .query_map([], Self::row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Get a single event by ID
    pub fn get_event(&self, id: i64) -> Result<Event, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, event_date, category, created_at, updated_at
             FROM events WHERE id = ?1",
        )?;
        stmt.query_row(rusqlite::params![id], Self::row_to_event)
            .map_err(DatabaseError::from)
    }

    /// Update an existing event
    pub fn update_event(&self, event: &Event) -> Result<(), DatabaseError> {
        let id = event.id.ok_or(DatabaseError::MissingId)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE events SET title = ?1, description = ?2, event_date = ?3,
             category = ?4, updated_at = ?5 WHERE id = ?6",
            rusqlite::params![
                event.title,
                event.description,
                event.event_date,
                event.category.as_str(),
                event.updated_at,
                id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete an event by ID
    pub fn delete_event(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM events WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(())
    }

    // ---- journals ----

    fn row_to_journal(row: &rusqlite::Row) -> Result<JournalEntry, rusqlite::Error> {
        let mood: String = row.get(3)?;
        Ok(JournalEntry {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            content: row.get(2)?,
            mood: Mood::parse(&mood),
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    /// Insert a journal entry and return its ID
    pub fn insert_journal(&self, journal: &JournalEntry) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO journals (title, content, mood, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                journal.title,
                journal.content,
                journal.mood.as_str(),
                journal.created_at,
                journal.updated_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all journal entries, newest first
    pub fn get_all_journals(&self) -> Result<Vec<JournalEntry>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, mood, created_at, updated_at
             FROM journals ORDER BY created_at DESC, id DESC",
        )?;
        let journals = stmt
            .query_map([], Self::row_to_journal)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(journals)
    }

    /// Get a single journal entry by ID
    pub fn get_journal(&self, id: i64) -> Result<JournalEntry, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, mood, created_at, updated_at
             FROM journals WHERE id = ?1",
        )?;
        stmt.query_row(rusqlite::params![id], Self::row_to_journal)
            .map_err(DatabaseError::from)
    }

    /// Update an existing journal entry
    pub fn update_journal(&self, journal: &JournalEntry) -> Result<(), DatabaseError> {
        let id = journal.id.ok_or(DatabaseError::MissingId)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE journals SET title = ?1, content = ?2, mood = ?3, updated_at = ?4 WHERE id = ?5",
            rusqlite::params![
                journal.title,
                journal.content,
                journal.mood.as_str(),
                journal.updated_at,
                id
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a journal entry by ID
    pub fn delete_journal(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM journals WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(())
    }

    // ---- focus sessions ----

    /// Append a completed focus session and return its ID
    pub fn insert_session(&self, session: &FocusSession) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO focus_sessions (task_id, duration_minutes, completed_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![session.task_id, session.duration_minutes, session.completed_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_all_sessions(&self) -> Result<Vec<FocusSession>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, duration_minutes, completed_at
             FROM focus_sessions ORDER BY completed_at",
        )?;
        let sessions = stmt
            .query_map([], |row| {
                Ok(FocusSession {
                    id: Some(row.get(0)?),
                    task_id: row.get(1)?,
                    duration_minutes: row.get(2)?,
                    completed_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    /// Count and total minutes of sessions completed on the given local day
    /// (`day` is YYYY-MM-DD; completed_at stores a local timestamp prefixed
    /// with that day).
    pub fn daily_session_stats(&self, day: &str) -> Result<(i64, i64), DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT COUNT(*), COALESCE(SUM(duration_minutes), 0)
             FROM focus_sessions WHERE completed_at LIKE ?1 || '%'",
        )?;
        let stats = stmt.query_row(rusqlite::params![day], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("app.db");
        let db = Database::new(path.to_str().expect("utf-8 path")).expect("open db");
        (dir, db)
    }

    #[test]
    fn task_crud_round_trip() {
        let (_dir, db) = open_test_db();

        let mut task = Task::new("write report".to_string());
        task.due_date = Some("2024-03-01".to_string());
        let id = db.insert_task(&task).unwrap();

        let mut loaded = db.get_task(id).unwrap();
        assert_eq!(loaded.title, "write report");
        assert_eq!(loaded.status, TaskStatus::Pending);
        assert_eq!(loaded.due_date.as_deref(), Some("2024-03-01"));

        loaded.status = TaskStatus::InProgress;
        loaded.description = Some("quarterly numbers".to_string());
        db.update_task(&loaded).unwrap();
        assert_eq!(db.get_task(id).unwrap().status, TaskStatus::InProgress);

        db.delete_task(id).unwrap();
        assert!(db.get_task(id).is_err());
    }

    #[test]
    fn task_status_and_notes_updates() {
        let (_dir, db) = open_test_db();
        let id = db.insert_task(&Task::new("t".to_string())).unwrap();

        db.update_task_status(id, TaskStatus::Completed).unwrap();
        assert_eq!(db.get_task(id).unwrap().status, TaskStatus::Completed);

        assert_eq!(db.get_task_notes(id).unwrap(), "");
        db.update_task_notes(id, "**draft**").unwrap();
        assert_eq!(db.get_task_notes(id).unwrap(), "**draft**");
    }

    #[test]
    fn events_listed_by_date_ascending() {
        let (_dir, db) = open_test_db();
        db.insert_event(&Event::new("later".to_string(), "2024-05-02".to_string()))
            .unwrap();
        db.insert_event(&Event::new("sooner".to_string(), "2024-05-01".to_string()))
            .unwrap();

        let events = db.get_all_events().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "sooner");
        assert_eq!(events[1].title, "later");
    }

    #[test]
    fn journal_crud_round_trip() {
        let (_dir, db) = open_test_db();
        let mut entry = JournalEntry::new("first entry".to_string());
        entry.content = Some("good day overall".to_string());
        entry.mood = Mood::Happy;
        let id = db.insert_journal(&entry).unwrap();

        let loaded = db.get_journal(id).unwrap();
        assert_eq!(loaded.mood, Mood::Happy);

        db.delete_journal(id).unwrap();
        assert!(db.get_all_journals().unwrap().is_empty());
    }

    #[test]
    fn daily_session_stats_count_only_the_given_day() {
        let (_dir, db) = open_test_db();

        let mut today = FocusSession::new(25, None);
        today.completed_at = "2024-03-01 10:00:00".to_string();
        db.insert_session(&today).unwrap();

        let mut also_today = FocusSession::new(25, Some(7));
        also_today.completed_at = "2024-03-01 15:30:00".to_string();
        db.insert_session(&also_today).unwrap();

        let mut yesterday = FocusSession::new(25, None);
        yesterday.completed_at = "2024-02-29 23:00:00".to_string();
        db.insert_session(&yesterday).unwrap();

        let (count, minutes) = db.daily_session_stats("2024-03-01").unwrap();
        assert_eq!(count, 2);
        assert_eq!(minutes, 50);

        let (count, minutes) = db.daily_session_stats("2024-03-02").unwrap();
        assert_eq!(count, 0);
        assert_eq!(minutes, 0);
    }

    #[test]
    fn notes_column_migration_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");
        let path_str = path.to_str().unwrap();
        {
            let _db = Database::new(path_str).unwrap();
        }
        // Reopening runs initialize_schema + migration again
        let db = Database::new(path_str).unwrap();
        let id = db.insert_task(&Task::new("t".to_string())).unwrap();
        db.update_task_notes(id, "kept").unwrap();
        assert_eq!(db.get_task_notes(id).unwrap(), "kept");
    }
}
