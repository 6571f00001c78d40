pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod scratchpad;
pub mod sound;
pub mod stats;
pub mod timer;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use models::{Event, FocusSession, JournalEntry, Task};
pub use utils::Profile;
