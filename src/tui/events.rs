use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::tui::app::{CreateForm, EventField, JournalField, Mode, Tab};
use crate::tui::render::render;
use crate::tui::widgets::confirm_delete::DELETE_OPTIONS;
use crate::tui::{App, Layout, TuiError};
use crate::utils;

/// Restores the terminal even when the loop exits via `?`
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn matches_binding(binding: &str, key: &KeyEvent) -> bool {
    match utils::parse_key_binding(binding) {
        Ok(parsed) => {
            if parsed.key_code != key.code {
                return false;
            }
            if parsed.requires_ctrl {
                utils::has_primary_modifier(key.modifiers)
            } else {
                !utils::has_primary_modifier(key.modifiers)
            }
        }
        Err(e) => {
            log::warn!("bad key binding '{}': {}", binding, e);
            false
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    let (cols, rows) = terminal_size()?;
    if cols < Layout::MIN_WIDTH + 2 || rows < Layout::MIN_HEIGHT + 2 {
        return Err(TuiError::IoError(io::Error::other(format!(
            "terminal too small: need at least {}x{}",
            Layout::MIN_WIDTH + 2,
            Layout::MIN_HEIGHT + 2
        ))));
    }

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    while !app.should_quit {
        let now = Instant::now();

        if now.duration_since(app.focus.last_tick) >= Duration::from_secs(1) {
            app.focus.last_tick = now;
            app.handle_timer_tick();
        }

        if let Err(e) = app.focus.scratchpad.poll(now, &app.db) {
            log::warn!("scratchpad autosave failed: {}", e);
            app.status.set("Scratchpad save failed");
        }

        app.status.expire(now);

        terminal.draw(|f| render(f, &mut app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(&mut app, key)?;
                }
                _ => {}
            }
        }
    }

    // Last chance for unsaved scratchpad edits
    if let Err(e) = app.focus.scratchpad.flush_pending(&app.db) {
        log::warn!("scratchpad flush on exit failed: {}", e);
    }

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<(), TuiError> {
    match app.mode {
        Mode::View => handle_view_key(app, key)?,
        Mode::Search => handle_search_key(app, key),
        Mode::Create => handle_form_key(app, key)?,
        Mode::Help => handle_help_key(app, key),
        Mode::ConfirmDelete => handle_confirm_delete_key(app, key)?,
        Mode::ScratchpadEdit => handle_scratchpad_key(app, key),
    }
    Ok(())
}

fn handle_view_key(app: &mut App, key: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();

    // Tab-local bindings first; Space means different things on
    // the Tasks and Focus tabs
    match app.ui.current_tab {
        Tab::Tasks if matches_binding(&kb.toggle_task_status, &key) => {
            return app.toggle_selected_task_status();
        }
        Tab::Focus => {
            if matches_binding(&kb.timer_toggle, &key) {
                app.focus.timer.toggle();
                return Ok(());
            }
            if matches_binding(&kb.timer_reset, &key) {
                app.focus.timer.reset();
                return Ok(());
            }
            if matches_binding(&kb.timer_switch_mode, &key) {
                let other = app.focus.timer.mode().other();
                app.focus.timer.switch_mode(other);
                return Ok(());
            }
            if matches_binding(&kb.scratchpad_edit, &key) {
                if app.focus.scratchpad.is_loaded() {
                    app.mode = Mode::ScratchpadEdit;
                } else {
                    app.status.set("Scratchpad is not loaded");
                }
                return Ok(());
            }
            if matches_binding(&kb.select, &key) {
                app.cycle_scratchpad_target();
                return Ok(());
            }
        }
        _ => {}
    }

    if matches_binding(&kb.quit, &key) {
        app.should_quit = true;
    } else if matches_binding(&kb.help, &key) {
        app.ui.help_scroll = 0;
        app.mode = Mode::Help;
    } else if matches_binding(&kb.search, &key) {
        app.enter_search();
    } else if matches_binding(&kb.new, &key) {
        app.open_create_form();
    } else if matches_binding(&kb.edit, &key) {
        app.open_edit_form();
    } else if matches_binding(&kb.delete, &key) {
        app.request_delete();
    } else if matches_binding(&kb.select, &key) {
        app.open_edit_form();
    } else if matches_binding(&kb.toggle_sidebar, &key) {
        app.ui.sidebar_visible = !app.ui.sidebar_visible;
    } else if matches_binding(&kb.list_up, &key) || key.code == KeyCode::Up {
        app.select_prev();
    } else if matches_binding(&kb.list_down, &key) || key.code == KeyCode::Down {
        app.select_next();
    } else if matches_binding(&kb.tab_left, &key) {
        app.prev_tab();
    } else if matches_binding(&kb.tab_right, &key) {
        app.next_tab();
    } else if matches_binding(&kb.tab_1, &key) {
        app.switch_tab(Tab::Dashboard);
    } else if matches_binding(&kb.tab_2, &key) {
        app.switch_tab(Tab::Tasks);
    } else if matches_binding(&kb.tab_3, &key) {
        app.switch_tab(Tab::Events);
    } else if matches_binding(&kb.tab_4, &key) {
        app.switch_tab(Tab::Journal);
    } else if matches_binding(&kb.tab_5, &key) {
        app.switch_tab(Tab::Focus);
    } else if key.code == KeyCode::PageUp {
        app.ui.item_scroll = app.ui.item_scroll.saturating_sub(5);
    } else if key.code == KeyCode::PageDown {
        app.ui.item_scroll += 5;
    }

    Ok(())
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_search(false),
        KeyCode::Enter => app.exit_search(true),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(ch) => app.push_search_char(ch),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    let kb = app.config.key_bindings.clone();
    if key.code == KeyCode::Esc || matches_binding(&kb.help, &key) {
        app.mode = Mode::View;
    } else if matches_binding(&kb.list_up, &key) || key.code == KeyCode::Up {
        app.ui.help_scroll = app.ui.help_scroll.saturating_sub(1);
    } else if matches_binding(&kb.list_down, &key) || key.code == KeyCode::Down {
        app.ui.help_scroll += 1;
    }
}

fn handle_confirm_delete_key(app: &mut App, key: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::View;
            Ok(())
        }
        KeyCode::Up | KeyCode::Down => {
            app.delete_option = (app.delete_option + 1) % DELETE_OPTIONS.len();
            Ok(())
        }
        _ if matches_binding(&kb.list_up, &key) || matches_binding(&kb.list_down, &key) => {
            app.delete_option = (app.delete_option + 1) % DELETE_OPTIONS.len();
            Ok(())
        }
        KeyCode::Enter => app.confirm_delete(),
        _ => Ok(()),
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();

    if key.code == KeyCode::Esc {
        app.cancel_form();
        return Ok(());
    }
    if matches_binding(&kb.save, &key) {
        return app.save_form();
    }

    let Some(open_form) = app.form.as_mut() else {
        return Ok(());
    };

    match open_form {
        CreateForm::Task(form) => {
            match key.code {
                KeyCode::Tab => form.next_field(),
                KeyCode::BackTab => form.prev_field(),
                KeyCode::Enter if form.is_multiline_active() => {
                    form.active_editor_mut().insert_newline()
                }
                KeyCode::Enter => form.next_field(),
                _ => apply_editor_key(form.active_editor_mut(), key),
            }
        }
        CreateForm::Event(form) => match key.code {
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Enter if form.is_multiline_active() => {
                if let Some(editor) = form.active_editor_mut() {
                    editor.insert_newline();
                }
            }
            KeyCode::Enter => form.next_field(),
            KeyCode::Left | KeyCode::Right if form.current_field == EventField::Category => {
                form.cycle_category(key.code == KeyCode::Right);
            }
            _ => {
                if let Some(editor) = form.active_editor_mut() {
                    apply_editor_key(editor, key);
                }
            }
        },
        CreateForm::Journal(form) => match key.code {
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Enter if form.is_multiline_active() => {
                if let Some(editor) = form.active_editor_mut() {
                    editor.insert_newline();
                }
            }
            KeyCode::Enter => form.next_field(),
            KeyCode::Left | KeyCode::Right if form.current_field == JournalField::Mood => {
                form.cycle_mood(key.code == KeyCode::Right);
            }
            _ => {
                if let Some(editor) = form.active_editor_mut() {
                    apply_editor_key(editor, key);
                }
            }
        },
    }

    Ok(())
}

fn handle_scratchpad_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.mode = Mode::View;
        return;
    }

    match key.code {
        KeyCode::Enter => app.focus.scratchpad_editor.insert_newline(),
        _ => apply_editor_key(&mut app.focus.scratchpad_editor, key),
    }
    app.sync_scratchpad(Instant::now());
}

/// Shared text-editing keys for any editor buffer
fn apply_editor_key(editor: &mut crate::tui::widgets::editor::Editor, key: KeyEvent) {
    match key.code {
        KeyCode::Char(ch) => editor.insert_char(ch),
        KeyCode::Backspace => editor.delete_char(),
        KeyCode::Up => editor.move_cursor_up(),
        KeyCode::Down => editor.move_cursor_down(),
        KeyCode::Left => editor.move_cursor_left(),
        KeyCode::Right => editor.move_cursor_right(),
        KeyCode::Home => editor.move_cursor_home(),
        KeyCode::End => editor.move_cursor_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn plain_binding_rejects_modified_press() {
        assert!(matches_binding("q", &key(KeyCode::Char('q'))));
        assert!(!matches_binding("q", &ctrl(KeyCode::Char('q'))));
        assert!(!matches_binding("q", &key(KeyCode::Char('x'))));
    }

    #[test]
    fn ctrl_binding_requires_modifier() {
        assert!(matches_binding("Ctrl+s", &ctrl(KeyCode::Char('s'))));
        assert!(!matches_binding("Ctrl+s", &key(KeyCode::Char('s'))));
    }

    #[test]
    fn special_key_names_resolve() {
        assert!(matches_binding("Space", &key(KeyCode::Char(' '))));
        assert!(matches_binding("Enter", &key(KeyCode::Enter)));
        assert!(matches_binding("F1", &key(KeyCode::F(1))));
        assert!(!matches_binding("garbage-name", &key(KeyCode::Enter)));
    }
}
