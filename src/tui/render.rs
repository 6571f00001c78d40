use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::{CreateForm, Mode, Tab};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::{
    confirm_delete, dashboard, event_list, focus_pane, form, help, item_view, journal_list,
    status_bar, tabs, task_list,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display;

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let active_theme = app.config.get_active_theme();
    let fg = parse_color(&active_theme.fg);
    let bg = parse_color(&active_theme.bg);

    if area.width < Layout::MIN_WIDTH + 2 || area.height < Layout::MIN_HEIGHT + 2 {
        let msg = Paragraph::new(format!(
            "Terminal too small\nneed at least {}x{}",
            Layout::MIN_WIDTH + 2,
            Layout::MIN_HEIGHT + 2
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(fg).bg(bg));
        f.render_widget(msg, area);
        return;
    }

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" TEMPO ")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg).bg(bg));
    f.render_widget(outer, area);

    let sidebar_collapsed =
        !app.ui.sidebar_visible || !app.ui.current_tab.has_item_list() || app.form.is_some();
    let layout = Layout::calculate(
        area,
        app.config.sidebar_width_percent,
        sidebar_collapsed,
    );

    tabs::render_tabs(f, layout.tabs_area, app.ui.current_tab, &app.config);

    if !sidebar_collapsed {
        match app.ui.current_tab {
            Tab::Tasks => task_list::render_task_list(
                f,
                layout.sidebar_area,
                &app.filtered_tasks,
                app.tasks.len(),
                &mut app.ui.task_list_state,
                &app.config,
            ),
            Tab::Events => event_list::render_event_list(
                f,
                layout.sidebar_area,
                &app.filtered_events,
                app.events.len(),
                &mut app.ui.event_list_state,
                &app.config,
            ),
            Tab::Journal => journal_list::render_journal_list(
                f,
                layout.sidebar_area,
                &app.filtered_journals,
                app.journals.len(),
                &mut app.ui.journal_list_state,
                &app.config,
            ),
            _ => {}
        }
    }

    // Main pane: an open form wins, otherwise the tab's own content
    if let Some(open_form) = &mut app.form {
        match open_form {
            CreateForm::Task(task_form) => {
                form::render_task_form(f, layout.main_area, task_form, &app.config)
            }
            CreateForm::Event(event_form) => {
                form::render_event_form(f, layout.main_area, event_form, &app.config)
            }
            CreateForm::Journal(journal_form) => {
                form::render_journal_form(f, layout.main_area, journal_form, &app.config)
            }
        }
    } else {
        match app.ui.current_tab {
            Tab::Dashboard => dashboard::render_dashboard(
                f,
                layout.main_area,
                &app.tasks,
                &app.events,
                &app.journals,
                app.focus.summary(),
                &app.config,
            ),
            Tab::Focus => {
                let editing = app.mode == Mode::ScratchpadEdit;
                focus_pane::render_focus_pane(f, layout.main_area, app, editing);
            }
            Tab::Tasks | Tab::Events | Tab::Journal => {
                let item = app.selected_item();
                item_view::render_item_view(
                    f,
                    layout.main_area,
                    item.as_ref(),
                    app.ui.item_scroll,
                    &app.config,
                );
            }
        }
    }

    let search_line;
    let message = if app.mode == Mode::Search {
        search_line = format!("Search: {}▏", app.search.query);
        Some(&search_line)
    } else {
        app.status.message.as_ref()
    };
    let hints = get_key_hints(app);
    status_bar::render_status_bar(f, layout.status_area, message, &hints, &app.config);

    match app.mode {
        Mode::Help => help::render_help(f, area, app.ui.help_scroll, &app.config),
        Mode::ConfirmDelete => {
            if let Some(item) = app.selected_item() {
                confirm_delete::render_confirm_delete(
                    f,
                    area,
                    &item,
                    app.delete_option,
                    &app.config,
                );
            }
        }
        _ => {}
    }
}

fn hint(key: &str, action: &str) -> String {
    format!("{} {}", format_key_binding_for_display(key), action)
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.mode {
        Mode::Search => vec![
            "Enter keep filter".to_string(),
            "Esc clear".to_string(),
        ],
        Mode::Create => vec![
            "Tab next field".to_string(),
            hint(&kb.save, "save"),
            "Esc cancel".to_string(),
        ],
        Mode::Help => vec![
            hint(&kb.list_up, "scroll"),
            "Esc close".to_string(),
        ],
        Mode::ConfirmDelete => vec![
            hint(&kb.list_up, "choose"),
            hint(&kb.select, "confirm"),
            "Esc cancel".to_string(),
        ],
        Mode::ScratchpadEdit => vec!["Esc done".to_string()],
        Mode::View => match app.ui.current_tab {
            Tab::Dashboard => vec![
                hint(&kb.tab_right, "tabs"),
                hint(&kb.help, "help"),
                hint(&kb.quit, "quit"),
            ],
            Tab::Focus => vec![
                hint(&kb.timer_toggle, "start/pause"),
                hint(&kb.timer_reset, "reset"),
                hint(&kb.timer_switch_mode, "mode"),
                hint(&kb.scratchpad_edit, "edit pad"),
                hint(&kb.select, "pad target"),
            ],
            Tab::Tasks => vec![
                hint(&kb.new, "new"),
                hint(&kb.edit, "edit"),
                hint(&kb.delete, "delete"),
                hint(&kb.toggle_task_status, "status"),
                hint(&kb.search, "search"),
                hint(&kb.help, "help"),
            ],
            Tab::Events | Tab::Journal => vec![
                hint(&kb.new, "new"),
                hint(&kb.edit, "edit"),
                hint(&kb.delete, "delete"),
                hint(&kb.search, "search"),
                hint(&kb.help, "help"),
            ],
        },
    }
}
