use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::models::{EventCategory, Mood};
use crate::tui::app::{EventField, EventForm, JournalField, JournalForm, TaskField, TaskForm};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::editor::Editor;

fn field_styles(config: &Config) -> (Style, Style) {
    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };
    let active = Style::default().bg(highlight_bg).fg(highlight_fg);
    let inactive = Style::default()
        .fg(parse_color(&active_theme.fg))
        .add_modifier(Modifier::DIM);
    (active, inactive)
}

/// Single-line field. Returns the cursor position when the field is active.
fn render_line_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    editor: &Editor,
    style: Style,
    active: bool,
) -> Option<(u16, u16)> {
    let content_width = area.width.saturating_sub(2) as usize;
    let line = editor.lines.first().cloned().unwrap_or_default();

    // Keep the cursor in view by sliding the visible window
    let scroll_col = editor.cursor_col.saturating_sub(content_width.saturating_sub(1));
    let visible: String = line.chars().skip(scroll_col).take(content_width).collect();

    let paragraph = Paragraph::new(visible)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);

    if !active {
        return None;
    }
    let col = (editor.cursor_col - scroll_col).min(content_width) as u16;
    Some((area.x + 1 + col, area.y + 1))
}

/// Multi-line field backed by the editor's own scroll state.
fn render_text_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    editor: &mut Editor,
    style: Style,
    active: bool,
) -> Option<(u16, u16)> {
    let viewport_height = area.height.saturating_sub(2) as usize;
    let viewport_width = area.width.saturating_sub(2) as usize;

    editor.update_scroll(viewport_height);
    editor.update_horizontal_scroll(viewport_width);
    let lines = editor.visible_lines(viewport_height, viewport_width);

    let paragraph = Paragraph::new(lines.join("\n"))
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);

    if !active {
        return None;
    }
    editor.cursor_screen_pos(area, viewport_height)
}

/// Choice field cycled with left/right, no cursor.
fn render_choice_field(f: &mut Frame, area: Rect, title: &str, value: &str, style: Style) {
    let paragraph = Paragraph::new(format!("◂ {} ▸", value))
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);
}

pub fn render_task_form(f: &mut Frame, area: Rect, form: &mut TaskForm, config: &Config) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let (active, inactive) = field_styles(config);
    let current = form.current_field;
    let style_for = move |field: TaskField| if current == field { active } else { inactive };

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let mut cursor = render_line_field(
        f,
        field_areas[0],
        "Title",
        &form.title,
        style_for(TaskField::Title),
        form.current_field == TaskField::Title,
    );
    cursor = render_line_field(
        f,
        field_areas[1],
        "Due Date (YYYY-MM-DD)",
        &form.due_date,
        style_for(TaskField::DueDate),
        form.current_field == TaskField::DueDate,
    )
    .or(cursor);
    cursor = render_text_field(
        f,
        field_areas[2],
        "Description",
        &mut form.description,
        style_for(TaskField::Description),
        form.current_field == TaskField::Description,
    )
    .or(cursor);

    if let Some(pos) = cursor {
        f.set_cursor_position(pos);
    }
}

pub fn render_event_form(f: &mut Frame, area: Rect, form: &mut EventForm, config: &Config) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let (active, inactive) = field_styles(config);
    let current = form.current_field;
    let style_for = move |field: EventField| if current == field { active } else { inactive };

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let mut cursor = render_line_field(
        f,
        field_areas[0],
        "Title",
        &form.title,
        style_for(EventField::Title),
        form.current_field == EventField::Title,
    );
    cursor = render_line_field(
        f,
        field_areas[1],
        "Date (YYYY-MM-DD)",
        &form.date,
        style_for(EventField::Date),
        form.current_field == EventField::Date,
    )
    .or(cursor);
    render_choice_field(
        f,
        field_areas[2],
        "Category",
        form.category().as_str(),
        style_for(EventField::Category),
    );
    cursor = render_text_field(
        f,
        field_areas[3],
        "Description",
        &mut form.description,
        style_for(EventField::Description),
        form.current_field == EventField::Description,
    )
    .or(cursor);

    if let Some(pos) = cursor {
        f.set_cursor_position(pos);
    }
}

pub fn render_journal_form(f: &mut Frame, area: Rect, form: &mut JournalForm, config: &Config) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let (active, inactive) = field_styles(config);
    let current = form.current_field;
    let style_for = move |field: JournalField| if current == field { active } else { inactive };

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let mut cursor = render_line_field(
        f,
        field_areas[0],
        "Title",
        &form.title,
        style_for(JournalField::Title),
        form.current_field == JournalField::Title,
    );
    render_choice_field(
        f,
        field_areas[1],
        "Mood",
        form.mood().as_str(),
        style_for(JournalField::Mood),
    );
    cursor = render_text_field(
        f,
        field_areas[2],
        "Content",
        &mut form.content,
        style_for(JournalField::Content),
        form.current_field == JournalField::Content,
    )
    .or(cursor);

    if let Some(pos) = cursor {
        f.set_cursor_position(pos);
    }
}

pub const EVENT_CATEGORIES: [EventCategory; 4] = [
    EventCategory::Uncategorized,
    EventCategory::Meeting,
    EventCategory::Deadline,
    EventCategory::Personal,
];

pub const MOODS: [Mood; 4] = [Mood::Neutral, Mood::Happy, Mood::Grateful, Mood::Sad];
