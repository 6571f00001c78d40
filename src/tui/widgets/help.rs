use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::confirm_delete::popup_area;
use crate::utils::format_key_binding_for_display;

fn binding_line(key: &str, action: &str, accent: ratatui::style::Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<10}", format_key_binding_for_display(key)),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(action.to_string()),
    ])
}

fn section(title: &str, accent: ratatui::style::Color) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    ))
}

pub fn render_help(f: &mut Frame, area: Rect, scroll_offset: usize, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.highlight_bg);
    let kb = &config.key_bindings;

    let mut lines: Vec<Line> = Vec::new();

    lines.push(section("Navigation", accent));
    lines.push(binding_line(&kb.tab_left, "previous tab", accent));
    lines.push(binding_line(&kb.tab_right, "next tab", accent));
    lines.push(binding_line("1-5", "jump to tab", accent));
    lines.push(binding_line(&kb.list_up, "move up", accent));
    lines.push(binding_line(&kb.list_down, "move down", accent));
    lines.push(binding_line(&kb.toggle_sidebar, "toggle sidebar", accent));
    lines.push(Line::from(""));

    lines.push(section("Items", accent));
    lines.push(binding_line(&kb.new, "new item", accent));
    lines.push(binding_line(&kb.edit, "edit item", accent));
    lines.push(binding_line(&kb.save, "save form", accent));
    lines.push(binding_line(&kb.delete, "delete item", accent));
    lines.push(binding_line(&kb.search, "search", accent));
    lines.push(binding_line(&kb.toggle_task_status, "cycle task status", accent));
    lines.push(Line::from(""));

    lines.push(section("Focus tab", accent));
    lines.push(binding_line(&kb.timer_toggle, "start / pause timer", accent));
    lines.push(binding_line(&kb.timer_reset, "reset timer", accent));
    lines.push(binding_line(&kb.timer_switch_mode, "switch focus / break", accent));
    lines.push(binding_line(&kb.scratchpad_edit, "edit scratchpad", accent));
    lines.push(binding_line(&kb.select, "cycle scratchpad target", accent));
    lines.push(Line::from(""));

    lines.push(section("General", accent));
    lines.push(binding_line(&kb.help, "toggle this help", accent));
    lines.push(binding_line(&kb.quit, "quit", accent));
    lines.push(Line::from(""));
    lines.push(Line::from("Esc closes popups and cancels forms."));

    let popup = popup_area(area, 48, 24.min(area.height));
    f.render_widget(Clear, popup);

    let viewport = popup.height.saturating_sub(2) as usize;
    let max_offset = lines.len().saturating_sub(viewport);
    let offset = scroll_offset.min(max_offset);
    let visible: Vec<Line> = lines.into_iter().skip(offset).take(viewport).collect();

    let widget = Paragraph::new(visible)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .style(Style::default().fg(fg));
    f.render_widget(widget, popup);
}
