use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{ListItem, ListState};

use crate::Config;
use crate::models::{JournalEntry, Mood};
use crate::tui::widgets::list::{render_sidebar_list, truncate_row};

pub fn mood_symbol(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "☺",
        Mood::Sad => "☹",
        Mood::Neutral => "−",
        Mood::Grateful => "♥",
    }
}

pub fn render_journal_list(
    f: &mut Frame,
    area: Rect,
    journals: &[JournalEntry],
    total_count: usize,
    list_state: &mut ListState,
    config: &Config,
) {
    let title = if journals.len() == total_count {
        format!("Journal ({})", journals.len())
    } else {
        format!("Journal ({} of {})", journals.len(), total_count)
    };

    let items: Vec<ListItem> = journals
        .iter()
        .map(|entry| {
            let day = entry.created_at.split(' ').next().unwrap_or("");
            let row = format!("{} {}  {}", mood_symbol(entry.mood), day, entry.title);
            ListItem::new(truncate_row(row, area))
        })
        .collect();

    render_sidebar_list(f, area, title, items, list_state, config);
}
