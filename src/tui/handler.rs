//! Event handler for the TUI
//!
//! Routes keyboard events to the open dialog or to the rule list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick => app.tick(),
        Event::Resize(_, _) => {}
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.has_dialog() {
        handle_dialog_key(app, key);
    } else {
        handle_list_key(app, key);
    }
}

/// Handle keys on the rule list
fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Home | KeyCode::Char('g') => app.selected_index = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.selected_index = app.rules.len().saturating_sub(1);
        }

        KeyCode::Char('a') => app.open_add_rule(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit_rule(),
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.stage_removal(),
        KeyCode::Char('u') => app.undo_removal(),

        KeyCode::Char('x') => app.open_export(),
        KeyCode::Char('i') => app.open_import(),

        _ => {}
    }
}

/// Handle keys while a dialog is open
fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match app.active_dialog.clone() {
        ActiveDialog::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.close_dialog();
            }
        }
        ActiveDialog::AddRule | ActiveDialog::EditRule(_) => {
            dialogs::rule_form::handle_key(app, key);
        }
        ActiveDialog::Export => {
            dialogs::export::handle_key(app, key);
        }
        ActiveDialog::ImportPicker => {
            dialogs::import::handle_picker_key(app, key);
        }
        ActiveDialog::ImportMode(source) => {
            dialogs::import::handle_mode_key(app, &source, key);
        }
        ActiveDialog::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SmsCodePaths;
    use crate::config::settings::Settings;
    use crate::services::RuleService;
    use crate::storage::Storage;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn create_test_app() -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SmsCodePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        RuleService::new(&storage)
            .create("Acme", "code", r"\d{6}")
            .unwrap();

        let app = App::new(Arc::new(storage), Settings::default()).unwrap();
        (temp_dir, app)
    }

    #[test]
    fn test_remove_and_undo_keys() {
        let (_temp_dir, mut app) = create_test_app();

        press(&mut app, KeyCode::Char('d'));
        assert!(app.rules.is_empty());
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.rules.len(), 1);
    }

    #[test]
    fn test_add_rule_by_typing() {
        let (_temp_dir, mut app) = create_test_app();

        press(&mut app, KeyCode::Char('a'));
        for c in "Bank".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        for c in "otp".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        for c in r"\d+".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert!(!app.has_dialog());
        assert_eq!(app.rules.len(), 2);
        assert!(app.rules.iter().any(|r| r.company == "Bank"));
    }

    #[test]
    fn test_typing_q_in_form_does_not_quit() {
        let (_temp_dir, mut app) = create_test_app();

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.rule_form.company.value(), "q");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_toggles() {
        let (_temp_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.active_dialog, ActiveDialog::Help);
        press(&mut app, KeyCode::Esc);
        assert!(!app.has_dialog());
    }
}
