use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::Config;
use crate::scratchpad::{Scratchpad, Target};
use crate::timer::{format_clock, FocusTimer, Mode};
use crate::tui::app::App;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::dashboard::FocusSummary;
use crate::tui::widgets::editor::Editor;

pub fn render_focus_pane(f: &mut Frame, area: Rect, app: &mut App, editing: bool) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(area);

    render_timer(
        f,
        rows[0],
        &app.focus.timer,
        app.focus.summary(),
        &app.config,
    );
    render_scratchpad(
        f,
        rows[1],
        &app.focus.scratchpad,
        &mut app.focus.scratchpad_editor,
        app.focus.scratchpad_target_title.as_deref(),
        editing,
        &app.config,
    );
}

fn render_timer(
    f: &mut Frame,
    area: Rect,
    timer: &FocusTimer,
    summary: FocusSummary,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.highlight_bg);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(timer.mode().label());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 5 {
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let state = if timer.is_running() { "running" } else { "paused" };
    let clock_style = match timer.mode() {
        Mode::Focus => Style::default().fg(accent).add_modifier(Modifier::BOLD),
        Mode::Break => Style::default().fg(fg).add_modifier(Modifier::BOLD),
    };

    let clock = Paragraph::new(Line::from(Span::styled(
        format_clock(timer.remaining()),
        clock_style,
    )))
    .alignment(Alignment::Center);
    f.render_widget(clock, parts[1]);

    let state_line = Paragraph::new(Line::from(state))
        .alignment(Alignment::Center)
        .style(Style::default().fg(fg));
    f.render_widget(state_line, parts[2]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(accent))
        .ratio(timer.progress().clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, parts[3]);

    let marker = if summary.approximate { " (~)" } else { "" };
    let tally = Paragraph::new(Line::from(format!(
        "today: {} sessions, {} min{}",
        summary.sessions, summary.minutes, marker
    )))
    .alignment(Alignment::Center)
    .style(Style::default().fg(fg));
    if parts[4].height > 0 {
        f.render_widget(tally, parts[4]);
    }
}

fn render_scratchpad(
    f: &mut Frame,
    area: Rect,
    scratchpad: &Scratchpad,
    editor: &mut Editor,
    target_title: Option<&str>,
    editing: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);

    let target = match scratchpad.target() {
        Target::Local => "local".to_string(),
        Target::Task(_) => format!("task: {}", target_title.unwrap_or("?")),
    };
    let dirty = if scratchpad.is_dirty() { " *" } else { "" };
    let title = format!("Scratchpad ({}){}", target, dirty);

    let viewport_height = area.height.saturating_sub(2) as usize;
    let viewport_width = area.width.saturating_sub(2) as usize;
    editor.update_scroll(viewport_height);
    editor.update_horizontal_scroll(viewport_width);
    let lines = editor.visible_lines(viewport_height, viewport_width);

    let border_style = if editing {
        Style::default().fg(parse_color(&active_theme.highlight_bg))
    } else {
        Style::default().fg(fg)
    };

    let widget = Paragraph::new(lines.join("\n"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .style(Style::default().fg(fg));
    f.render_widget(widget, area);

    if editing {
        if let Some((x, y)) = editor.cursor_screen_pos(area, viewport_height) {
            f.set_cursor_position((x, y));
        }
    }
}
