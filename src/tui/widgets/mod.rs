pub mod color;
pub mod confirm_delete;
pub mod dashboard;
pub mod editor;
pub mod event_list;
pub mod focus_pane;
pub mod form;
pub mod help;
pub mod item_view;
pub mod journal_list;
pub mod list;
pub mod status_bar;
pub mod tabs;
pub mod task_list;
