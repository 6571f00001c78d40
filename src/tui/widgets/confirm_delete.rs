use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::app::SelectedItem;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// Center a popup of the given size inside `area`
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub const DELETE_OPTIONS: [&str; 2] = ["Delete", "Cancel"];

pub fn render_confirm_delete(
    f: &mut Frame,
    area: Rect,
    item: &SelectedItem,
    selected_option: usize,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let (kind, title) = match item {
        SelectedItem::Task(task) => ("task", task.title.as_str()),
        SelectedItem::Event(event) => ("event", event.title.as_str()),
        SelectedItem::Journal(entry) => ("journal entry", entry.title.as_str()),
    };

    let popup = popup_area(area, 44, 8);
    f.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(format!("Delete {} \"{}\"?", kind, title)),
        Line::from(""),
    ];
    for (i, option) in DELETE_OPTIONS.iter().enumerate() {
        let style = if i == selected_option {
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(parse_color(&active_theme.fg))
        };
        let prefix = if i == selected_option { "> " } else { "  " };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, option), style)));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Confirm"))
        .style(Style::default().fg(parse_color(&active_theme.fg)));
    f.render_widget(widget, popup);
}
