use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Text;
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratskin::RatSkin;
use termimad::minimad::Text as MinimadText;

use crate::Config;
use crate::stats::{due_label, today};
use crate::tui::app::SelectedItem;
use crate::tui::widgets::color::parse_color;

/// Build the markdown shown in the detail pane for the selected item.
pub fn get_content_string(item: &SelectedItem) -> String {
    let mut content = String::new();

    match item {
        SelectedItem::Task(task) => {
            content.push_str(&format!("# {}\n\n", task.title));
            content.push_str(&format!("**Status:** {}\n\n", task.status.as_str()));
            if let Some(due) = &task.due_date {
                match due_label(task, today()) {
                    Some(label) => {
                        content.push_str(&format!("**Due:** {} ({})\n\n", due, label.describe()))
                    }
                    None => content.push_str(&format!("**Due:** {}\n\n", due)),
                }
            }
            if let Some(description) = &task.description {
                if !description.is_empty() {
                    content.push_str(&format!("{}\n\n", description));
                }
            }
            if let Some(notes) = &task.notes {
                if !notes.is_empty() {
                    content.push_str("---\n\n## Notes\n\n");
                    content.push_str(notes);
                    content.push('\n');
                }
            }
        }
        SelectedItem::Event(event) => {
            content.push_str(&format!("# {}\n\n", event.title));
            content.push_str(&format!("**Date:** {}\n\n", event.event_date));
            content.push_str(&format!("**Category:** {}\n\n", event.category.as_str()));
            if let Some(description) = &event.description {
                if !description.is_empty() {
                    content.push_str(&format!("{}\n", description));
                }
            }
        }
        SelectedItem::Journal(entry) => {
            content.push_str(&format!("# {}\n\n", entry.title));
            content.push_str(&format!("**Mood:** {}\n\n", entry.mood.as_str()));
            content.push_str(&format!("**Written:** {}\n\n", entry.created_at));
            if let Some(body) = &entry.content {
                if !body.is_empty() {
                    content.push_str("---\n\n");
                    content.push_str(body);
                    content.push('\n');
                }
            }
        }
    }

    content
}

pub fn render_item_view(
    f: &mut Frame,
    area: Rect,
    item: Option<&SelectedItem>,
    scroll_offset: usize,
    config: &Config,
) {
    let active_theme = config.get_active_theme();

    let Some(item) = item else {
        let placeholder = Paragraph::new("Nothing selected")
            .block(Block::default().borders(Borders::ALL).title("Details"))
            .style(Style::default().fg(parse_color(&active_theme.fg)));
        f.render_widget(placeholder, area);
        return;
    };

    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let content_area = areas[0];
    let scrollbar_area = areas[1];

    let content = get_content_string(item);
    let skin = RatSkin::default();
    let text_width = content_area.width.saturating_sub(2);
    let markdown: MinimadText = RatSkin::parse_text(&content);
    let lines = skin.parse(markdown, text_width);

    let viewport_height = content_area.height.saturating_sub(2) as usize;
    let total_lines = lines.len();
    let max_offset = total_lines.saturating_sub(viewport_height);
    let offset = scroll_offset.min(max_offset);

    let visible: Vec<_> = lines
        .into_iter()
        .skip(offset)
        .take(viewport_height)
        .collect();

    let paragraph = Paragraph::new(Text::from(visible))
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .style(Style::default().fg(parse_color(&active_theme.fg)));
    f.render_widget(paragraph, content_area);

    if total_lines > viewport_height && scrollbar_area.width > 0 && content_area.height > 2 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            content_area.y + 1,
            scrollbar_area.width,
            content_area.height.saturating_sub(2),
        );

        if scrollbar_inner_area.height > 0 {
            let mut scrollbar_state = ScrollbarState::new(total_lines)
                .viewport_content_length(viewport_height)
                .position(offset);

            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
        }
    }
}
