use ratatui::widgets::Paragraph;
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::Config;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let max_width = area.width as usize;

    let (content, style) = if let Some(msg) = message {
        // Status messages get a highlighted background for visibility
        let msg_fg = get_contrast_text_color(highlight_bg);
        (
            truncate_with_ellipsis(msg, max_width),
            Style::default()
                .fg(msg_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            fit_hints(key_hints, max_width),
            Style::default().fg(fg_color).bg(bg_color),
        )
    };

    // Simple 1-line display, no Block wrapper
    let paragraph = Paragraph::new(content).style(style);
    f.render_widget(paragraph, area);
}

/// Join as many hints as fit, separated by bullets, ending with an
/// ellipsis when some had to be dropped
fn fit_hints(hints: &[String], max_width: usize) -> String {
    let separator = " • ";
    let mut text = String::new();

    for (i, hint) in hints.iter().enumerate() {
        let would_be = text.chars().count()
            + if i == 0 { 0 } else { separator.chars().count() }
            + hint.chars().count();
        if would_be > max_width {
            if text.is_empty() {
                return truncate_with_ellipsis(hint, max_width);
            }
            return truncate_with_ellipsis(&format!("{}{}", text, separator), max_width);
        }
        if i > 0 {
            text.push_str(separator);
        }
        text.push_str(hint);
    }

    text
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
