use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{ListItem, ListState};

use crate::Config;
use crate::models::{Task, TaskStatus};
use crate::stats::{due_label, today};
use crate::tui::widgets::list::{render_sidebar_list, truncate_row};

pub fn status_symbol(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "○",
        TaskStatus::InProgress => "◐",
        TaskStatus::Completed => "✓",
        TaskStatus::Cancelled => "✗",
    }
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    total_count: usize,
    list_state: &mut ListState,
    config: &Config,
) {
    let title = if tasks.len() == total_count {
        format!("Tasks ({})", tasks.len())
    } else {
        format!("Tasks ({} of {})", tasks.len(), total_count)
    };

    let reference = today();
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let mut row = format!("{} {}", status_symbol(task.status), task.title);
            if let Some(label) = due_label(task, reference) {
                row.push_str(&format!("  [{}]", label.describe()));
            }
            ListItem::new(truncate_row(row, area))
        })
        .collect();

    render_sidebar_list(f, area, title, items, list_state, config);
}
