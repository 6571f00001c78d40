//! Scratchpad persistence with debounced autosave.
//!
//! The scratchpad either targets a standalone markdown file in the data
//! directory or the notes column of a task. Edits mark the buffer dirty;
//! `poll()` flushes once the debounce window has elapsed with no further
//! edits. Nothing is written until the target's current content has been
//! loaded, so a slow load can never be clobbered by an empty buffer.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::database::{Database, DatabaseError};

pub const SCRATCHPAD_FILE: &str = "scratchpad.md";

#[derive(Error, Debug)]
pub enum ScratchpadError {
    #[error("Scratchpad file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scratchpad database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Where the scratchpad content lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The standalone scratchpad.md in the data directory
    Local,
    /// The notes column of a task
    Task(i64),
}

#[derive(Debug)]
pub struct Scratchpad {
    target: Target,
    content: String,
    /// Set once the target's stored content has been read in. Saves are
    /// gated on this so an unloaded buffer cannot overwrite real notes.
    loaded: bool,
    /// Time of the most recent edit since the last flush
    dirty_since: Option<Instant>,
    debounce: Duration,
    local_path: PathBuf,
}

impl Scratchpad {
    pub fn new(data_dir: PathBuf, debounce_ms: u64) -> Self {
        Self {
            target: Target::Local,
            content: String::new(),
            loaded: false,
            dirty_since: None,
            debounce: Duration::from_millis(debounce_ms),
            local_path: data_dir.join(SCRATCHPAD_FILE),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Retarget the scratchpad and load the new target's stored content.
    /// Unsaved edits against the previous target are discarded.
    pub fn set_target(&mut self, target: Target, db: &Database) -> Result<(), ScratchpadError> {
        self.target = target;
        self.dirty_since = None;
        self.loaded = false;
        self.content = match target {
            Target::Local => {
                if self.local_path.exists() {
                    fs::read_to_string(&self.local_path)?
                } else {
                    String::new()
                }
            }
            Target::Task(id) => db.get_task_notes(id)?,
        };
        self.loaded = true;
        Ok(())
    }

    /// Replace the buffer and restart the debounce window. Ignored until
    /// the target's content has been loaded.
    pub fn set_content(&mut self, content: String, now: Instant) {
        if !self.loaded {
            return;
        }
        self.content = content;
        self.dirty_since = Some(now);
    }

    /// Flush if the debounce window has elapsed since the last edit.
    /// Returns true when a write actually happened.
    pub fn poll(&mut self, now: Instant, db: &Database) -> Result<bool, ScratchpadError> {
        let Some(dirty_since) = self.dirty_since else {
            return Ok(false);
        };
        if now.duration_since(dirty_since) < self.debounce {
            return Ok(false);
        }
        self.flush(db)?;
        Ok(true)
    }

    /// Immediate flush of any pending edits, used on retarget-away points
    /// the caller wants preserved and on shutdown
    pub fn flush_pending(&mut self, db: &Database) -> Result<bool, ScratchpadError> {
        if self.dirty_since.is_none() {
            return Ok(false);
        }
        self.flush(db)?;
        Ok(true)
    }

    fn flush(&mut self, db: &Database) -> Result<(), ScratchpadError> {
        // Cleared up front: a failed write is reported once and never
        // retried, so the deadline must not survive the attempt.
        self.dirty_since = None;
        match self.target {
            Target::Local => fs::write(&self.local_path, &self.content)?,
            Target::Task(id) => db.update_task_notes(id, &self.content)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskStatus};
    use tempfile::tempdir;

    fn test_db(dir: &std::path::Path) -> Database {
        Database::new(dir.join("test.db").to_str().unwrap()).unwrap()
    }

    fn sample_task(db: &Database) -> i64 {
        let mut task = Task::new("Write report".to_string());
        task.status = TaskStatus::Pending;
        task.notes = Some("existing notes".to_string());
        db.insert_task(&task).unwrap()
    }

    #[test]
    fn edits_before_load_are_ignored() {
        let dir = tempdir().unwrap();
        let mut pad = Scratchpad::new(dir.path().to_path_buf(), 1000);
        pad.set_content("too early".to_string(), Instant::now());
        assert!(!pad.is_dirty());
        assert_eq!(pad.content(), "");
    }

    #[test]
    fn local_flush_waits_for_debounce() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let mut pad = Scratchpad::new(dir.path().to_path_buf(), 1000);
        pad.set_target(Target::Local, &db).unwrap();

        let start = Instant::now();
        pad.set_content("hello".to_string(), start);

        // Within the window: no write
        let flushed = pad
            .poll(start + Duration::from_millis(500), &db)
            .unwrap();
        assert!(!flushed);
        assert!(!dir.path().join(SCRATCHPAD_FILE).exists());

        // Window elapsed: single write
        let flushed = pad
            .poll(start + Duration::from_millis(1000), &db)
            .unwrap();
        assert!(flushed);
        assert_eq!(
            fs::read_to_string(dir.path().join(SCRATCHPAD_FILE)).unwrap(),
            "hello"
        );

        // Clean after flush: nothing more to write
        let flushed = pad.poll(start + Duration::from_secs(5), &db).unwrap();
        assert!(!flushed);
    }

    #[test]
    fn new_edit_restarts_the_window() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let mut pad = Scratchpad::new(dir.path().to_path_buf(), 1000);
        pad.set_target(Target::Local, &db).unwrap();

        let start = Instant::now();
        pad.set_content("a".to_string(), start);
        pad.set_content("ab".to_string(), start + Duration::from_millis(900));

        // 1s after the first edit but only 100ms after the second
        let flushed = pad
            .poll(start + Duration::from_millis(1000), &db)
            .unwrap();
        assert!(!flushed);

        let flushed = pad
            .poll(start + Duration::from_millis(1900), &db)
            .unwrap();
        assert!(flushed);
        assert_eq!(
            fs::read_to_string(dir.path().join(SCRATCHPAD_FILE)).unwrap(),
            "ab"
        );
    }

    #[test]
    fn task_target_loads_and_saves_notes() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let task_id = sample_task(&db);

        let mut pad = Scratchpad::new(dir.path().to_path_buf(), 1000);
        pad.set_target(Target::Task(task_id), &db).unwrap();
        assert_eq!(pad.content(), "existing notes");

        let start = Instant::now();
        pad.set_content("revised notes".to_string(), start);
        pad.poll(start + Duration::from_secs(2), &db).unwrap();

        assert_eq!(db.get_task_notes(task_id).unwrap(), "revised notes");
    }

    #[test]
    fn retarget_discards_pending_edits() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let task_id = sample_task(&db);

        let mut pad = Scratchpad::new(dir.path().to_path_buf(), 1000);
        pad.set_target(Target::Local, &db).unwrap();
        pad.set_content("unsaved local text".to_string(), Instant::now());

        pad.set_target(Target::Task(task_id), &db).unwrap();
        assert!(!pad.is_dirty());
        assert_eq!(pad.content(), "existing notes");

        // The local file was never written
        assert!(!dir.path().join(SCRATCHPAD_FILE).exists());
    }

    #[test]
    fn failed_flush_reports_once_and_does_not_retry() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());

        // Routing the data dir through a regular file makes the local
        // write fail while the initial load still succeeds
        let bogus_dir = dir.path().join("not-a-dir");
        fs::write(&bogus_dir, "").unwrap();
        let mut pad = Scratchpad::new(bogus_dir, 1000);
        pad.set_target(Target::Local, &db).unwrap();

        let start = Instant::now();
        pad.set_content("doomed".to_string(), start);
        assert!(pad.poll(start + Duration::from_secs(2), &db).is_err());

        // The failure clears the deadline, so the event loop does not
        // re-attempt the same write on every iteration
        assert!(!pad.is_dirty());
        let flushed = pad.poll(start + Duration::from_secs(4), &db).unwrap();
        assert!(!flushed);
    }

    #[test]
    fn flush_pending_writes_immediately() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let mut pad = Scratchpad::new(dir.path().to_path_buf(), 1000);
        pad.set_target(Target::Local, &db).unwrap();

        pad.set_content("shutdown text".to_string(), Instant::now());
        assert!(pad.flush_pending(&db).unwrap());
        assert_eq!(
            fs::read_to_string(dir.path().join(SCRATCHPAD_FILE)).unwrap(),
            "shutdown text"
        );
    }
}
