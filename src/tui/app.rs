use std::path::PathBuf;
use std::time::Instant;

use ratatui::widgets::ListState;

use crate::config::Config;
use crate::database::Database;
use crate::models::{Event, EventCategory, JournalEntry, Mood, Task};
use crate::scratchpad::{Scratchpad, Target};
use crate::timer::{FocusTimer, Mode as TimerMode, TickOutcome};
use crate::tui::error::TuiError;
use crate::tui::widgets::dashboard::FocusSummary;
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::form::{EVENT_CATEGORIES, MOODS};
use crate::utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Tasks,
    Events,
    Journal,
    Focus,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Tasks,
        Tab::Events,
        Tab::Journal,
        Tab::Focus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Tasks => "Tasks",
            Tab::Events => "Events",
            Tab::Journal => "Journal",
            Tab::Focus => "Focus",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn has_item_list(&self) -> bool {
        matches!(self, Tab::Tasks | Tab::Events | Tab::Journal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Search,
    Create,
    Help,
    ConfirmDelete,
    ScratchpadEdit,
}

#[derive(Debug, Clone)]
pub enum SelectedItem {
    Task(Task),
    Event(Event),
    Journal(JournalEntry),
}

impl SelectedItem {
    pub fn id(&self) -> Option<i64> {
        match self {
            SelectedItem::Task(t) => t.id,
            SelectedItem::Event(e) => e.id,
            SelectedItem::Journal(j) => j.id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    DueDate,
    Description,
}

pub struct TaskForm {
    pub id: Option<i64>,
    pub title: Editor,
    pub due_date: Editor,
    pub description: Editor,
    pub current_field: TaskField,
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            id: None,
            title: Editor::new(),
            due_date: Editor::new(),
            description: Editor::new(),
            current_field: TaskField::Title,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: Editor::from_string(task.title.clone()),
            due_date: Editor::from_string(task.due_date.clone().unwrap_or_default()),
            description: Editor::from_string(task.description.clone().unwrap_or_default()),
            current_field: TaskField::Title,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            TaskField::Title => TaskField::DueDate,
            TaskField::DueDate => TaskField::Description,
            TaskField::Description => TaskField::Title,
        };
    }

    pub fn prev_field(&mut self) {
        self.current_field = match self.current_field {
            TaskField::Title => TaskField::Description,
            TaskField::DueDate => TaskField::Title,
            TaskField::Description => TaskField::DueDate,
        };
    }

    pub fn active_editor_mut(&mut self) -> &mut Editor {
        match self.current_field {
            TaskField::Title => &mut self.title,
            TaskField::DueDate => &mut self.due_date,
            TaskField::Description => &mut self.description,
        }
    }

    pub fn is_multiline_active(&self) -> bool {
        self.current_field == TaskField::Description
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Title,
    Date,
    Category,
    Description,
}

pub struct EventForm {
    pub id: Option<i64>,
    pub title: Editor,
    pub date: Editor,
    pub description: Editor,
    pub category_index: usize,
    pub current_field: EventField,
}

impl EventForm {
    pub fn new() -> Self {
        Self {
            id: None,
            title: Editor::new(),
            date: Editor::new(),
            description: Editor::new(),
            category_index: 0,
            current_field: EventField::Title,
        }
    }

    pub fn from_event(event: &Event) -> Self {
        let category_index = EVENT_CATEGORIES
            .iter()
            .position(|c| *c == event.category)
            .unwrap_or(0);
        Self {
            id: event.id,
            title: Editor::from_string(event.title.clone()),
            date: Editor::from_string(event.event_date.clone()),
            description: Editor::from_string(event.description.clone().unwrap_or_default()),
            category_index,
            current_field: EventField::Title,
        }
    }

    pub fn category(&self) -> EventCategory {
        EVENT_CATEGORIES[self.category_index % EVENT_CATEGORIES.len()]
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let len = EVENT_CATEGORIES.len();
        self.category_index = if forward {
            (self.category_index + 1) % len
        } else {
            (self.category_index + len - 1) % len
        };
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            EventField::Title => EventField::Date,
            EventField::Date => EventField::Category,
            EventField::Category => EventField::Description,
            EventField::Description => EventField::Title,
        };
    }

    pub fn prev_field(&mut self) {
        self.current_field = match self.current_field {
            EventField::Title => EventField::Description,
            EventField::Date => EventField::Title,
            EventField::Category => EventField::Date,
            EventField::Description => EventField::Category,
        };
    }

    pub fn active_editor_mut(&mut self) -> Option<&mut Editor> {
        match self.current_field {
            EventField::Title => Some(&mut self.title),
            EventField::Date => Some(&mut self.date),
            EventField::Category => None,
            EventField::Description => Some(&mut self.description),
        }
    }

    pub fn is_multiline_active(&self) -> bool {
        self.current_field == EventField::Description
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalField {
    Title,
    Mood,
    Content,
}

pub struct JournalForm {
    pub id: Option<i64>,
    pub title: Editor,
    pub content: Editor,
    pub mood_index: usize,
    pub current_field: JournalField,
}

impl JournalForm {
    pub fn new() -> Self {
        Self {
            id: None,
            title: Editor::new(),
            content: Editor::new(),
            mood_index: 0,
            current_field: JournalField::Title,
        }
    }

    pub fn from_journal(entry: &JournalEntry) -> Self {
        let mood_index = MOODS.iter().position(|m| *m == entry.mood).unwrap_or(0);
        Self {
            id: entry.id,
            title: Editor::from_string(entry.title.clone()),
            content: Editor::from_string(entry.content.clone().unwrap_or_default()),
            mood_index,
            current_field: JournalField::Title,
        }
    }

    pub fn mood(&self) -> Mood {
        MOODS[self.mood_index % MOODS.len()]
    }

    pub fn cycle_mood(&mut self, forward: bool) {
        let len = MOODS.len();
        self.mood_index = if forward {
            (self.mood_index + 1) % len
        } else {
            (self.mood_index + len - 1) % len
        };
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            JournalField::Title => JournalField::Mood,
            JournalField::Mood => JournalField::Content,
            JournalField::Content => JournalField::Title,
        };
    }

    pub fn prev_field(&mut self) {
        self.current_field = match self.current_field {
            JournalField::Title => JournalField::Content,
            JournalField::Mood => JournalField::Title,
            JournalField::Content => JournalField::Mood,
        };
    }

    pub fn active_editor_mut(&mut self) -> Option<&mut Editor> {
        match self.current_field {
            JournalField::Title => Some(&mut self.title),
            JournalField::Mood => None,
            JournalField::Content => Some(&mut self.content),
        }
    }

    pub fn is_multiline_active(&self) -> bool {
        self.current_field == JournalField::Content
    }
}

pub enum CreateForm {
    Task(TaskForm),
    Event(EventForm),
    Journal(JournalForm),
}

/// List selection and scroll positions for the visible panes
pub struct UiState {
    pub current_tab: Tab,
    pub sidebar_visible: bool,
    pub task_list_state: ListState,
    pub event_list_state: ListState,
    pub journal_list_state: ListState,
    pub item_scroll: usize,
    pub help_scroll: usize,
}

impl UiState {
    fn new() -> Self {
        Self {
            current_tab: Tab::Dashboard,
            sidebar_visible: true,
            task_list_state: ListState::default(),
            event_list_state: ListState::default(),
            journal_list_state: ListState::default(),
            item_scroll: 0,
            help_scroll: 0,
        }
    }
}

pub struct StatusState {
    pub message: Option<String>,
    set_at: Option<Instant>,
}

impl StatusState {
    const TTL_SECS: u64 = 4;

    fn new() -> Self {
        Self {
            message: None,
            set_at: None,
        }
    }

    pub fn set(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.set_at = Some(Instant::now());
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.set_at = None;
    }

    /// Drop the message once it has been on screen long enough
    pub fn expire(&mut self, now: Instant) {
        if let Some(set_at) = self.set_at {
            if now.duration_since(set_at).as_secs() >= Self::TTL_SECS {
                self.clear();
            }
        }
    }
}

pub struct SearchState {
    pub query: String,
}

/// Where today's focus tally came from. LocalOnly means a session failed to
/// persist and the count is carried in memory for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallySource {
    Persisted,
    LocalOnly,
}

pub struct FocusState {
    pub timer: FocusTimer,
    pub scratchpad: Scratchpad,
    pub scratchpad_editor: Editor,
    pub scratchpad_target_title: Option<String>,
    pub sessions_today: i64,
    pub minutes_today: i64,
    pub tally_source: TallySource,
    pub last_tick: Instant,
}

impl FocusState {
    pub fn summary(&self) -> FocusSummary {
        FocusSummary {
            sessions: self.sessions_today,
            minutes: self.minutes_today,
            approximate: self.tally_source == TallySource::LocalOnly,
        }
    }
}

pub struct App {
    pub config: Config,
    pub db: Database,
    pub should_quit: bool,
    pub mode: Mode,
    pub ui: UiState,
    pub status: StatusState,
    pub search: SearchState,
    pub form: Option<CreateForm>,
    pub delete_option: usize,
    pub focus: FocusState,
    pub tasks: Vec<Task>,
    pub events: Vec<Event>,
    pub journals: Vec<JournalEntry>,
    pub filtered_tasks: Vec<Task>,
    pub filtered_events: Vec<Event>,
    pub filtered_journals: Vec<JournalEntry>,
}

impl App {
    pub fn new(config: Config, db: Database, data_dir: PathBuf) -> Result<Self, TuiError> {
        let timer = FocusTimer::new(config.timer.focus_minutes, config.timer.break_minutes);
        let mut scratchpad = Scratchpad::new(data_dir, config.scratchpad.debounce_ms);
        if let Err(e) = scratchpad.set_target(Target::Local, &db) {
            log::warn!("failed to load scratchpad: {}", e);
        }
        let scratchpad_editor = Editor::from_string(scratchpad.content().to_string());

        let mut app = Self {
            config,
            db,
            should_quit: false,
            mode: Mode::View,
            ui: UiState::new(),
            status: StatusState::new(),
            search: SearchState {
                query: String::new(),
            },
            form: None,
            delete_option: 0,
            focus: FocusState {
                timer,
                scratchpad,
                scratchpad_editor,
                scratchpad_target_title: None,
                sessions_today: 0,
                minutes_today: 0,
                tally_source: TallySource::Persisted,
                last_tick: Instant::now(),
            },
            tasks: Vec::new(),
            events: Vec::new(),
            journals: Vec::new(),
            filtered_tasks: Vec::new(),
            filtered_events: Vec::new(),
            filtered_journals: Vec::new(),
        };

        app.load_data()?;
        app.refresh_daily_stats();
        Ok(app)
    }

    pub fn load_data(&mut self) -> Result<(), TuiError> {
        self.tasks = self.db.get_all_tasks()?;
        self.events = self.db.get_all_events()?;
        self.journals = self.db.get_all_journals()?;
        self.apply_filter();
        Ok(())
    }

    fn matches(query: &str, haystacks: &[Option<&str>]) -> bool {
        haystacks.iter().any(|h| {
            h.map(|s| s.to_lowercase().contains(query))
                .unwrap_or(false)
        })
    }

    pub fn apply_filter(&mut self) {
        let query = self.search.query.to_lowercase();
        if query.is_empty() {
            self.filtered_tasks = self.tasks.clone();
            self.filtered_events = self.events.clone();
            self.filtered_journals = self.journals.clone();
        } else {
            self.filtered_tasks = self
                .tasks
                .iter()
                .filter(|t| Self::matches(&query, &[Some(&t.title), t.description.as_deref()]))
                .cloned()
                .collect();
            self.filtered_events = self
                .events
                .iter()
                .filter(|e| Self::matches(&query, &[Some(&e.title), e.description.as_deref()]))
                .cloned()
                .collect();
            self.filtered_journals = self
                .journals
                .iter()
                .filter(|j| Self::matches(&query, &[Some(&j.title), j.content.as_deref()]))
                .cloned()
                .collect();
        }
        self.clamp_selections();
    }

    fn clamp_selections(&mut self) {
        let clamp = |state: &mut ListState, len: usize| {
            if len == 0 {
                state.select(None);
            } else {
                let idx = state.selected().unwrap_or(0).min(len - 1);
                state.select(Some(idx));
            }
        };
        clamp(&mut self.ui.task_list_state, self.filtered_tasks.len());
        clamp(&mut self.ui.event_list_state, self.filtered_events.len());
        clamp(&mut self.ui.journal_list_state, self.filtered_journals.len());
    }

    fn current_list_len(&self) -> usize {
        match self.ui.current_tab {
            Tab::Tasks => self.filtered_tasks.len(),
            Tab::Events => self.filtered_events.len(),
            Tab::Journal => self.filtered_journals.len(),
            _ => 0,
        }
    }

    fn current_list_state(&mut self) -> Option<&mut ListState> {
        match self.ui.current_tab {
            Tab::Tasks => Some(&mut self.ui.task_list_state),
            Tab::Events => Some(&mut self.ui.event_list_state),
            Tab::Journal => Some(&mut self.ui.journal_list_state),
            _ => None,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.current_list_len();
        if let Some(state) = self.current_list_state() {
            if len == 0 {
                return;
            }
            let next = state.selected().map(|i| (i + 1).min(len - 1)).unwrap_or(0);
            state.select(Some(next));
        }
        self.ui.item_scroll = 0;
    }

    pub fn select_prev(&mut self) {
        let len = self.current_list_len();
        if let Some(state) = self.current_list_state() {
            if len == 0 {
                return;
            }
            let prev = state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
            state.select(Some(prev));
        }
        self.ui.item_scroll = 0;
    }

    pub fn selected_item(&self) -> Option<SelectedItem> {
        match self.ui.current_tab {
            Tab::Tasks => self
                .ui
                .task_list_state
                .selected()
                .and_then(|i| self.filtered_tasks.get(i))
                .map(|t| SelectedItem::Task(t.clone())),
            Tab::Events => self
                .ui
                .event_list_state
                .selected()
                .and_then(|i| self.filtered_events.get(i))
                .map(|e| SelectedItem::Event(e.clone())),
            Tab::Journal => self
                .ui
                .journal_list_state
                .selected()
                .and_then(|i| self.filtered_journals.get(i))
                .map(|j| SelectedItem::Journal(j.clone())),
            _ => None,
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.ui.current_tab = tab;
        self.ui.item_scroll = 0;
    }

    pub fn next_tab(&mut self) {
        let idx = (self.ui.current_tab.index() + 1) % Tab::ALL.len();
        self.switch_tab(Tab::ALL[idx]);
    }

    pub fn prev_tab(&mut self) {
        let idx = (self.ui.current_tab.index() + Tab::ALL.len() - 1) % Tab::ALL.len();
        self.switch_tab(Tab::ALL[idx]);
    }

    pub fn enter_search(&mut self) {
        if self.ui.current_tab.has_item_list() {
            self.mode = Mode::Search;
        }
    }

    pub fn exit_search(&mut self, keep_query: bool) {
        if !keep_query {
            self.search.query.clear();
            self.apply_filter();
        }
        self.mode = Mode::View;
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.query.push(ch);
        self.apply_filter();
    }

    pub fn pop_search_char(&mut self) {
        self.search.query.pop();
        self.apply_filter();
    }

    pub fn open_create_form(&mut self) {
        let form = match self.ui.current_tab {
            Tab::Tasks => CreateForm::Task(TaskForm::new()),
            Tab::Events => CreateForm::Event(EventForm::new()),
            Tab::Journal => CreateForm::Journal(JournalForm::new()),
            _ => return,
        };
        self.form = Some(form);
        self.mode = Mode::Create;
    }

    pub fn open_edit_form(&mut self) {
        let form = match self.selected_item() {
            Some(SelectedItem::Task(task)) => CreateForm::Task(TaskForm::from_task(&task)),
            Some(SelectedItem::Event(event)) => CreateForm::Event(EventForm::from_event(&event)),
            Some(SelectedItem::Journal(entry)) => {
                CreateForm::Journal(JournalForm::from_journal(&entry))
            }
            None => return,
        };
        self.form = Some(form);
        self.mode = Mode::Create;
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.mode = Mode::View;
    }

    /// Validate and persist the open form. Leaves the form open with a
    /// status message when validation fails.
    pub fn save_form(&mut self) -> Result<(), TuiError> {
        let Some(form) = self.form.take() else {
            return Ok(());
        };

        match &form {
            CreateForm::Task(task_form) => {
                let title = task_form.title.to_string().trim().to_string();
                if title.is_empty() {
                    self.status.set("Title is required");
                    self.form = Some(form);
                    return Ok(());
                }
                let due_raw = task_form.due_date.to_string().trim().to_string();
                let due_date = if due_raw.is_empty() {
                    None
                } else if utils::parse_date(&due_raw).is_ok() {
                    Some(due_raw)
                } else {
                    self.status.set("Due date must be YYYY-MM-DD");
                    self.form = Some(form);
                    return Ok(());
                };
                let description = task_form.description.to_string();
                let description = (!description.trim().is_empty()).then_some(description);

                if let Some(id) = task_form.id {
                    let mut task = self.db.get_task(id)?;
                    task.title = title;
                    task.due_date = due_date;
                    task.description = description;
                    self.db.update_task(&task)?;
                    self.status.set("Task updated");
                } else {
                    let mut task = Task::new(title);
                    task.due_date = due_date;
                    task.description = description;
                    self.db.insert_task(&task)?;
                    self.status.set("Task created");
                }
            }
            CreateForm::Event(event_form) => {
                let title = event_form.title.to_string().trim().to_string();
                if title.is_empty() {
                    self.status.set("Title is required");
                    self.form = Some(form);
                    return Ok(());
                }
                let date = event_form.date.to_string().trim().to_string();
                if utils::parse_date(&date).is_err() {
                    self.status.set("Date must be YYYY-MM-DD");
                    self.form = Some(form);
                    return Ok(());
                }
                let description = event_form.description.to_string();
                let description = (!description.trim().is_empty()).then_some(description);

                if let Some(id) = event_form.id {
                    let mut event = self.db.get_event(id)?;
                    event.title = title;
                    event.event_date = date;
                    event.category = event_form.category();
                    event.description = description;
                    self.db.update_event(&event)?;
                    self.status.set("Event updated");
                } else {
                    let mut event = Event::new(title, date);
                    event.category = event_form.category();
                    event.description = description;
                    self.db.insert_event(&event)?;
                    self.status.set("Event created");
                }
            }
            CreateForm::Journal(journal_form) => {
                let title = journal_form.title.to_string().trim().to_string();
                if title.is_empty() {
                    self.status.set("Title is required");
                    self.form = Some(form);
                    return Ok(());
                }
                let content = journal_form.content.to_string();
                let content = (!content.trim().is_empty()).then_some(content);

                if let Some(id) = journal_form.id {
                    let mut entry = self.db.get_journal(id)?;
                    entry.title = title;
                    entry.mood = journal_form.mood();
                    entry.content = content;
                    self.db.update_journal(&entry)?;
                    self.status.set("Journal entry updated");
                } else {
                    let mut entry = JournalEntry::new(title);
                    entry.mood = journal_form.mood();
                    entry.content = content;
                    self.db.insert_journal(&entry)?;
                    self.status.set("Journal entry created");
                }
            }
        }

        self.form = None;
        self.mode = Mode::View;
        self.load_data()
    }

    pub fn request_delete(&mut self) {
        if self.selected_item().is_some() {
            self.delete_option = 0;
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) -> Result<(), TuiError> {
        let confirmed = self.delete_option == 0;
        self.mode = Mode::View;
        if !confirmed {
            return Ok(());
        }
        let Some(item) = self.selected_item() else {
            return Ok(());
        };
        let Some(id) = item.id() else {
            return Ok(());
        };

        match item {
            SelectedItem::Task(_) => {
                // Point the scratchpad elsewhere before its backing row goes away
                if self.focus.scratchpad.target() == Target::Task(id) {
                    self.retarget_scratchpad(Target::Local);
                }
                self.db.delete_task(id)?;
                self.status.set("Task deleted");
            }
            SelectedItem::Event(_) => {
                self.db.delete_event(id)?;
                self.status.set("Event deleted");
            }
            SelectedItem::Journal(_) => {
                self.db.delete_journal(id)?;
                self.status.set("Journal entry deleted");
            }
        }
        self.load_data()
    }

    pub fn toggle_selected_task_status(&mut self) -> Result<(), TuiError> {
        if let Some(SelectedItem::Task(task)) = self.selected_item() {
            if let Some(id) = task.id {
                self.db.update_task_status(id, task.status.next())?;
                self.load_data()?;
            }
        }
        Ok(())
    }

    fn retarget_scratchpad(&mut self, target: Target) {
        match self.focus.scratchpad.set_target(target, &self.db) {
            Ok(()) => {
                self.focus.scratchpad_target_title = match target {
                    Target::Local => None,
                    Target::Task(id) => self
                        .tasks
                        .iter()
                        .find(|t| t.id == Some(id))
                        .map(|t| t.title.clone()),
                };
                self.focus.scratchpad_editor =
                    Editor::from_string(self.focus.scratchpad.content().to_string());
            }
            Err(e) => {
                log::warn!("scratchpad retarget failed: {}", e);
                self.status.set("Could not load scratchpad target");
            }
        }
    }

    /// Cycle the scratchpad through Local and each task, in list order
    pub fn cycle_scratchpad_target(&mut self) {
        let task_ids: Vec<i64> = self.tasks.iter().filter_map(|t| t.id).collect();
        let next = match self.focus.scratchpad.target() {
            Target::Local => match task_ids.first() {
                Some(id) => Target::Task(*id),
                None => return,
            },
            Target::Task(current) => match task_ids.iter().position(|id| *id == current) {
                Some(pos) if pos + 1 < task_ids.len() => Target::Task(task_ids[pos + 1]),
                _ => Target::Local,
            },
        };
        self.retarget_scratchpad(next);
    }

    /// Push the scratchpad editor's buffer into the autosave pipeline
    pub fn sync_scratchpad(&mut self, now: Instant) {
        self.focus
            .scratchpad
            .set_content(self.focus.scratchpad_editor.to_string(), now);
    }

    pub fn refresh_daily_stats(&mut self) {
        match self
            .db
            .daily_session_stats(&utils::get_current_date_string())
        {
            Ok((sessions, minutes)) => {
                self.focus.sessions_today = sessions;
                self.focus.minutes_today = minutes;
                self.focus.tally_source = TallySource::Persisted;
            }
            Err(e) => {
                log::warn!("failed to read daily session stats: {}", e);
            }
        }
    }

    /// Advance the countdown by one second and run the completion sequence
    /// when an interval ends: chime, persist (focus only), then flip modes.
    pub fn handle_timer_tick(&mut self) {
        match self.focus.timer.tick() {
            TickOutcome::Idle | TickOutcome::Ticked => {}
            TickOutcome::Completed(finished_mode) => {
                crate::sound::play_completion_chime();

                if finished_mode == TimerMode::Focus {
                    let task_id = match self.focus.scratchpad.target() {
                        Target::Task(id) => Some(id),
                        Target::Local => None,
                    };
                    let session =
                        crate::models::FocusSession::new(self.focus.timer.focus_minutes(), task_id);
                    match self.db.insert_session(&session) {
                        Ok(_) => self.refresh_daily_stats(),
                        Err(e) => {
                            // Session is kept in the on-screen tally even when
                            // the write fails; the dashboard marks it "(~)"
                            log::warn!("failed to persist focus session: {}", e);
                            self.focus.sessions_today += 1;
                            self.focus.minutes_today += self.focus.timer.focus_minutes();
                            self.focus.tally_source = TallySource::LocalOnly;
                        }
                    }
                    self.status.set("Focus session complete, take a break");
                } else {
                    self.status.set("Break over, back to focus");
                }

                self.focus.timer.advance_after_completion();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use tempfile::tempdir;

    fn test_app(dir: &std::path::Path) -> App {
        let db = Database::new(dir.join("test.db").to_str().unwrap()).unwrap();
        let config = Config::default();
        App::new(config, db, dir.to_path_buf()).unwrap()
    }

    #[test]
    fn search_filters_across_title_and_body() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());

        let mut a = Task::new("write report".to_string());
        a.description = Some("quarterly numbers".to_string());
        app.db.insert_task(&a).unwrap();
        app.db
            .insert_task(&Task::new("water plants".to_string()))
            .unwrap();
        app.load_data().unwrap();
        app.switch_tab(Tab::Tasks);

        for ch in "numbers".chars() {
            app.push_search_char(ch);
        }
        assert_eq!(app.filtered_tasks.len(), 1);
        assert_eq!(app.filtered_tasks[0].title, "write report");

        app.exit_search(false);
        assert_eq!(app.filtered_tasks.len(), 2);
    }

    #[test]
    fn save_form_rejects_empty_title_and_bad_date() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.switch_tab(Tab::Tasks);

        app.open_create_form();
        app.save_form().unwrap();
        assert_eq!(app.mode, Mode::Create);
        assert!(app.form.is_some());
        assert!(app.tasks.is_empty());

        if let Some(CreateForm::Task(form)) = app.form.as_mut() {
            form.title = Editor::from_string("valid title".to_string());
            form.due_date = Editor::from_string("not-a-date".to_string());
        }
        app.save_form().unwrap();
        assert_eq!(app.mode, Mode::Create);
        assert!(app.tasks.is_empty());

        if let Some(CreateForm::Task(form)) = app.form.as_mut() {
            form.due_date = Editor::from_string("2026-09-01".to_string());
        }
        app.save_form().unwrap();
        assert_eq!(app.mode, Mode::View);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].due_date.as_deref(), Some("2026-09-01"));
    }

    #[test]
    fn status_toggle_cycles_through_all_states() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.db
            .insert_task(&Task::new("cycle me".to_string()))
            .unwrap();
        app.load_data().unwrap();
        app.switch_tab(Tab::Tasks);
        app.ui.task_list_state.select(Some(0));

        let expected = [
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
            TaskStatus::Pending,
        ];
        for status in expected {
            app.toggle_selected_task_status().unwrap();
            assert_eq!(app.tasks[0].status, status);
        }
    }

    #[test]
    fn scratchpad_target_cycles_local_then_tasks_in_list_order() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());

        // Distinct timestamps: the task list is newest-first, so "newer"
        // leads the cycle
        let mut older = Task::new("older".to_string());
        older.created_at = "2024-03-01 10:00:00".to_string();
        let older_id = app.db.insert_task(&older).unwrap();
        let mut newer = Task::new("newer".to_string());
        newer.created_at = "2024-03-02 10:00:00".to_string();
        let newer_id = app.db.insert_task(&newer).unwrap();
        app.load_data().unwrap();

        assert_eq!(app.focus.scratchpad.target(), Target::Local);
        app.cycle_scratchpad_target();
        assert_eq!(app.focus.scratchpad.target(), Target::Task(newer_id));
        assert_eq!(app.focus.scratchpad_target_title.as_deref(), Some("newer"));
        app.cycle_scratchpad_target();
        assert_eq!(app.focus.scratchpad.target(), Target::Task(older_id));
        app.cycle_scratchpad_target();
        assert_eq!(app.focus.scratchpad.target(), Target::Local);
        assert!(app.focus.scratchpad_target_title.is_none());
    }

    #[test]
    fn deleting_targeted_task_falls_back_to_local() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());
        let id = app.db.insert_task(&Task::new("doomed".to_string())).unwrap();
        app.load_data().unwrap();
        app.switch_tab(Tab::Tasks);
        app.ui.task_list_state.select(Some(0));

        app.cycle_scratchpad_target();
        assert_eq!(app.focus.scratchpad.target(), Target::Task(id));

        app.request_delete();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        app.confirm_delete().unwrap();

        assert!(app.tasks.is_empty());
        assert_eq!(app.focus.scratchpad.target(), Target::Local);
    }

    #[test]
    fn scratchpad_flushes_into_the_given_data_dir() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());

        let start = Instant::now();
        app.focus.scratchpad_editor = Editor::from_string("pad text".to_string());
        app.sync_scratchpad(start);
        app.focus
            .scratchpad
            .poll(start + std::time::Duration::from_secs(2), &app.db)
            .unwrap();

        let written =
            std::fs::read_to_string(dir.path().join(crate::scratchpad::SCRATCHPAD_FILE)).unwrap();
        assert_eq!(written, "pad text");
    }

    #[test]
    fn completed_focus_interval_lands_in_daily_tally() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());
        assert_eq!(app.focus.sessions_today, 0);

        app.focus.timer.toggle();
        let total = app.focus.timer.remaining();
        for _ in 0..total {
            app.handle_timer_tick();
        }

        assert_eq!(app.focus.sessions_today, 1);
        assert_eq!(
            app.focus.minutes_today,
            app.config.timer.focus_minutes as i64
        );
        assert_eq!(app.focus.tally_source, TallySource::Persisted);
        assert_eq!(app.focus.timer.mode(), TimerMode::Break);
        assert!(!app.focus.timer.is_running());
    }

    #[test]
    fn completed_break_interval_is_not_persisted() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path());

        app.focus.timer.switch_mode(TimerMode::Break);
        app.focus.timer.toggle();
        let total = app.focus.timer.remaining();
        for _ in 0..total {
            app.handle_timer_tick();
        }

        assert_eq!(app.focus.sessions_today, 0);
        assert_eq!(app.focus.timer.mode(), TimerMode::Focus);
    }
}
