//! TUI Views module
//!
//! The rule list and status bar, plus dialog and notification overlays.

pub mod rule_list;
pub mod status_bar;

use ratatui::Frame;

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::{notification_rect, AppLayout};
use super::widgets::NotificationWidget;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    rule_list::render(frame, app, layout.main);
    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }

    if let Some(notification) = app.notifications.current() {
        frame.render_widget(
            NotificationWidget::new(notification),
            notification_rect(layout.main),
        );
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &mut App) {
    match app.active_dialog.clone() {
        ActiveDialog::Help => dialogs::help::render(frame, app),
        ActiveDialog::AddRule | ActiveDialog::EditRule(_) => dialogs::rule_form::render(frame, app),
        ActiveDialog::Export => dialogs::export::render(frame, app),
        ActiveDialog::ImportPicker => dialogs::import::render_picker(frame, app),
        ActiveDialog::ImportMode(source) => dialogs::import::render_mode(frame, &source),
        ActiveDialog::None => {}
    }
}
