use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{ListItem, ListState};

use crate::Config;
use crate::models::{Event, EventCategory};
use crate::tui::widgets::list::{render_sidebar_list, truncate_row};

pub fn category_symbol(category: EventCategory) -> &'static str {
    match category {
        EventCategory::Meeting => "◆",
        EventCategory::Deadline => "▲",
        EventCategory::Personal => "●",
        EventCategory::Uncategorized => "·",
    }
}

pub fn render_event_list(
    f: &mut Frame,
    area: Rect,
    events: &[Event],
    total_count: usize,
    list_state: &mut ListState,
    config: &Config,
) {
    let title = if events.len() == total_count {
        format!("Events ({})", events.len())
    } else {
        format!("Events ({} of {})", events.len(), total_count)
    };

    let items: Vec<ListItem> = events
        .iter()
        .map(|event| {
            let row = format!(
                "{} {}  {}",
                category_symbol(event.category),
                event.event_date,
                event.title
            );
            ListItem::new(truncate_row(row, area))
        })
        .collect();

    render_sidebar_list(f, area, title, items, list_state, config);
}
