use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline};

use crate::Config;
use crate::models::{Event, JournalEntry, Task};
use crate::stats::{
    completion_rate, mood_trend, recent_tasks, status_counts, today, today_events, total_words,
    due_label, upcoming_events, urgent_tasks,
};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::event_list::category_symbol;
use crate::tui::widgets::task_list::status_symbol;

/// Today's focus tally as shown on the dashboard. `approximate` is set when
/// the database could not be reached and the count is kept in memory only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusSummary {
    pub sessions: i64,
    pub minutes: i64,
    pub approximate: bool,
}

pub fn render_dashboard(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    events: &[Event],
    journals: &[JournalEntry],
    focus: FocusSummary,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.highlight_bg);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(6),
            Constraint::Length(7),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);

    render_task_summary(f, top[0], tasks, fg, accent);
    render_focus_summary(f, top[1], focus, fg, accent);
    render_journal_summary(f, top[2], journals, fg, accent);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_urgent_tasks(f, middle[0], tasks, fg);
    render_events_overview(f, middle[1], events, fg, accent);

    render_recent_tasks(f, rows[2], tasks, fg);
}

fn render_task_summary(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    fg: ratatui::style::Color,
    accent: ratatui::style::Color,
) {
    let counts = status_counts(tasks);
    let rate = completion_rate(counts.completed, counts.total());

    let lines = vec![
        Line::from(vec![
            Span::raw("○ pending     "),
            Span::styled(counts.pending.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw("◐ in progress "),
            Span::styled(
                counts.in_progress.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("✓ completed   "),
            Span::styled(
                counts.completed.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("✗ cancelled   "),
            Span::styled(
                counts.cancelled.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("completion    "),
            Span::styled(
                format!("{}%", rate),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .style(Style::default().fg(fg));
    f.render_widget(widget, area);
}

fn render_focus_summary(
    f: &mut Frame,
    area: Rect,
    focus: FocusSummary,
    fg: ratatui::style::Color,
    accent: ratatui::style::Color,
) {
    let marker = if focus.approximate { " (~)" } else { "" };
    let lines = vec![
        Line::from(vec![
            Span::raw("sessions "),
            Span::styled(
                format!("{}{}", focus.sessions, marker),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("minutes  "),
            Span::styled(
                format!("{}{}", focus.minutes, marker),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Focus Today"))
        .style(Style::default().fg(fg));
    f.render_widget(widget, area);
}

fn render_journal_summary(
    f: &mut Frame,
    area: Rect,
    journals: &[JournalEntry],
    fg: ratatui::style::Color,
    accent: ratatui::style::Color,
) {
    let block = Block::default().borders(Borders::ALL).title("Journal");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let summary = Line::from(vec![
        Span::raw(format!("{} entries, ", journals.len())),
        Span::styled(
            format!("{} words", total_words(journals)),
            Style::default().fg(accent),
        ),
    ]);
    let text_area = Rect::new(inner.x, inner.y, inner.width, 1);
    f.render_widget(Paragraph::new(summary).style(Style::default().fg(fg)), text_area);

    // Mood trend over the last two weeks of entries
    let trend: Vec<u64> = mood_trend(journals, 14)
        .into_iter()
        .map(|(_, v)| v as u64)
        .collect();
    if !trend.is_empty() && inner.height > 1 {
        let spark_area = Rect::new(
            inner.x,
            inner.y + 1,
            inner.width,
            inner.height.saturating_sub(1),
        );
        let sparkline = Sparkline::default()
            .data(&trend)
            .max(4)
            .style(Style::default().fg(accent));
        f.render_widget(sparkline, spark_area);
    }
}

fn render_urgent_tasks(f: &mut Frame, area: Rect, tasks: &[Task], fg: ratatui::style::Color) {
    let reference = today();
    let urgent = urgent_tasks(tasks, reference);

    let lines: Vec<Line> = if urgent.is_empty() {
        vec![Line::from("Nothing due within 5 days")]
    } else {
        urgent
            .iter()
            .map(|&task| {
                let label = due_label(task, reference)
                    .map(|l| format!("  [{}]", l.describe()))
                    .unwrap_or_default();
                Line::from(format!(
                    "{} {}{}",
                    status_symbol(task.status),
                    task.title,
                    label
                ))
            })
            .collect()
    };

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Urgent"))
        .style(Style::default().fg(fg));
    f.render_widget(widget, area);
}

fn render_events_overview(
    f: &mut Frame,
    area: Rect,
    events: &[Event],
    fg: ratatui::style::Color,
    accent: ratatui::style::Color,
) {
    let reference = today();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "Today",
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    )));
    let today_list = today_events(events, reference);
    if today_list.is_empty() {
        lines.push(Line::from("  (none)"));
    }
    for event in today_list {
        lines.push(Line::from(format!(
            "  {} {}",
            category_symbol(event.category),
            event.title
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Upcoming",
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    )));
    let upcoming = upcoming_events(events, reference);
    if upcoming.is_empty() {
        lines.push(Line::from("  (none)"));
    }
    for event in upcoming.iter().take(5) {
        lines.push(Line::from(format!(
            "  {} {}  {}",
            category_symbol(event.category),
            event.event_date,
            event.title
        )));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Events"))
        .style(Style::default().fg(fg));
    f.render_widget(widget, area);
}

fn render_recent_tasks(f: &mut Frame, area: Rect, tasks: &[Task], fg: ratatui::style::Color) {
    let lines: Vec<Line> = if tasks.is_empty() {
        vec![Line::from("No tasks yet")]
    } else {
        recent_tasks(tasks)
            .iter()
            .map(|task| {
                let day = task.created_at.split(' ').next().unwrap_or("");
                Line::from(format!(
                    "{} {}  {}",
                    status_symbol(task.status),
                    day,
                    task.title
                ))
            })
            .collect()
    };

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Recent"))
        .style(Style::default().fg(fg));
    f.render_widget(widget, area);
}
