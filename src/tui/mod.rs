//! Terminal User Interface module
//!
//! The rule list screen: add, edit and remove rules with undo, and export or
//! import backups on a background task while the screen stays responsive.

pub mod app;
pub mod dialogs;
pub mod event;
pub mod handler;
pub mod layout;
pub mod terminal;
pub mod views;
pub mod widgets;

pub use app::App;
pub use terminal::run_tui;
