//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events:
//! the rule list as shown, the removal waiting for undo, the running backup
//! job and any open dialog.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::backup::{
    is_valid_filename, BackupManager, BackupTask, ExportResult, ImportResult,
};
use crate::config::settings::Settings;
use crate::error::SmsCodeResult;
use crate::models::{Rule, RuleId};
use crate::services::{RuleEdit, RuleService};
use crate::storage::Storage;

use super::dialogs::export::ExportFormState;
use super::dialogs::import::ImportPickerState;
use super::dialogs::rule_form::RuleFormState;
use super::widgets::Notification;
use super::widgets::Notifications;

/// Currently active dialog (if any)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    AddRule,
    EditRule(RuleId),
    Export,
    ImportPicker,
    /// Ask whether to keep existing rules when importing this file
    ImportMode(PathBuf),
}

/// A removal that can still be undone
#[derive(Debug, Clone)]
pub struct PendingRemoval {
    pub rule: Rule,
    /// Position the rule occupied in the list
    pub position: usize,
    pub removed_at: Instant,
}

impl PendingRemoval {
    /// Time left before the removal is committed
    pub fn remaining(&self, window: Duration) -> Duration {
        window.saturating_sub(self.removed_at.elapsed())
    }
}

/// The backup operation currently running
pub enum BackupJob {
    Export {
        task: BackupTask<ExportResult>,
        destination: PathBuf,
    },
    Import {
        task: BackupTask<ImportResult>,
        source: PathBuf,
    },
}

impl BackupJob {
    /// Short description for the status bar
    pub fn describe(&self) -> String {
        match self {
            Self::Export { destination, .. } => format!("Exporting to {}", file_label(destination)),
            Self::Import { source, .. } => format!("Importing {}", file_label(source)),
        }
    }

    fn is_pending(&self) -> bool {
        match self {
            Self::Export { task, .. } => task.is_pending(),
            Self::Import { task, .. } => task.is_pending(),
        }
    }
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Main application state
pub struct App {
    /// The storage layer, shared with import jobs
    pub storage: Arc<Storage>,

    /// Application settings
    pub settings: Settings,

    /// Backup directory and naming
    pub backup: BackupManager,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Currently active dialog
    pub active_dialog: ActiveDialog,

    /// Rules as shown, in list order
    pub rules: Vec<Rule>,

    /// Selected rule index in the list
    pub selected_index: usize,

    /// Removal waiting for the undo window to pass
    pub pending_removal: Option<PendingRemoval>,

    /// How long a removal can be undone
    pub undo_window: Duration,

    /// Running export or import
    pub backup_job: Option<BackupJob>,

    /// Toast notifications
    pub notifications: Notifications,

    /// Add/edit rule form state
    pub rule_form: RuleFormState,

    /// Export file name form state
    pub export_form: ExportFormState,

    /// Backup file picker state
    pub import_picker: ImportPickerState,
}

impl App {
    /// Create a new App instance
    pub fn new(storage: Arc<Storage>, settings: Settings) -> SmsCodeResult<Self> {
        let backup = BackupManager::from_settings(&settings, storage.paths());
        let rules = storage.rules.get_all()?;

        Ok(Self {
            undo_window: settings.undo_window(),
            storage,
            settings,
            backup,
            should_quit: false,
            active_dialog: ActiveDialog::default(),
            rules,
            selected_index: 0,
            pending_removal: None,
            backup_job: None,
            notifications: Notifications::default(),
            rule_form: RuleFormState::new(),
            export_form: ExportFormState::new(),
            import_picker: ImportPickerState::default(),
        })
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Commit anything outstanding before the app exits
    ///
    /// A running backup job is waited for so its file work is not cut short.
    pub fn shutdown(&mut self) {
        self.commit_pending_removal();
        if let Some(job) = self.backup_job.take() {
            debug!("waiting for {} before exit", job.describe());
            match job {
                BackupJob::Export { task, .. } => {
                    task.wait();
                }
                BackupJob::Import { task, .. } => {
                    task.wait();
                }
            }
        }
    }

    /// Push a notification
    pub fn notify(&mut self, notification: Notification) {
        self.notifications.show(notification);
    }

    /// Check if a dialog is open
    pub fn has_dialog(&self) -> bool {
        self.active_dialog != ActiveDialog::None
    }

    /// Open a dialog
    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        self.active_dialog = dialog;
    }

    /// Close the current dialog
    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
    }

    /// Whether an export or import is running
    pub fn is_busy(&self) -> bool {
        self.backup_job.is_some()
    }

    fn refuse_if_busy(&mut self) -> bool {
        if let Some(job) = &self.backup_job {
            let message = format!("{} - please wait", job.describe());
            self.notify(Notification::warning(message));
            true
        } else {
            false
        }
    }

    /// The selected rule, if any
    pub fn selected_rule(&self) -> Option<&Rule> {
        self.rules.get(self.selected_index)
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.rules.len() {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.rules.len().saturating_sub(1));
    }

    /// Reload the shown list from storage
    pub fn reload_rules(&mut self) {
        match self.storage.rules.get_all() {
            Ok(rules) => {
                self.rules = rules;
                self.clamp_selection();
            }
            Err(e) => {
                error!(error = %e, "failed to reload rules");
                self.notify(Notification::error(format!("Failed to load rules: {}", e)));
            }
        }
    }

    /// Called on every tick
    pub fn tick(&mut self) {
        if let Some(pending) = &self.pending_removal {
            if pending.removed_at.elapsed() >= self.undo_window {
                self.commit_pending_removal();
            }
        }
        self.poll_backup_job();
        self.notifications.expire();
    }

    // Removal with undo

    /// Remove the selected rule from the list; storage is only updated
    /// once the undo window passes or another rule is removed
    pub fn stage_removal(&mut self) {
        if self.refuse_if_busy() || self.rules.is_empty() {
            return;
        }

        self.commit_pending_removal();

        let position = self.selected_index.min(self.rules.len() - 1);
        let rule = self.rules.remove(position);
        self.clamp_selection();

        self.notify(Notification::removal(&rule, self.undo_window));
        self.pending_removal = Some(PendingRemoval {
            rule,
            position,
            removed_at: Instant::now(),
        });
    }

    /// Put the removed rule back where it was
    pub fn undo_removal(&mut self) {
        let Some(pending) = self.pending_removal.take() else {
            return;
        };

        let position = pending.position.min(self.rules.len());
        self.notify(Notification::success(format!("Restored {}", pending.rule)));
        self.rules.insert(position, pending.rule);
        self.selected_index = position;
    }

    /// Delete the staged rule from storage
    pub fn commit_pending_removal(&mut self) {
        let Some(pending) = self.pending_removal.take() else {
            return;
        };
        self.notifications.dismiss_undo_prompt();

        if let Err(e) = RuleService::new(&self.storage).delete(pending.rule.id) {
            if !e.is_not_found() {
                error!(rule = %pending.rule.id, error = %e, "failed to delete rule");
                self.notify(Notification::error(format!("Failed to remove rule: {}", e)));
                let position = pending.position.min(self.rules.len());
                self.rules.insert(position, pending.rule);
            }
        }
    }

    // Add / edit

    /// Open the form for a new rule
    pub fn open_add_rule(&mut self) {
        if self.refuse_if_busy() {
            return;
        }
        self.rule_form = RuleFormState::new();
        self.open_dialog(ActiveDialog::AddRule);
    }

    /// Open the form for the selected rule
    pub fn open_edit_rule(&mut self) {
        if self.refuse_if_busy() {
            return;
        }
        if let Some(rule) = self.selected_rule() {
            let id = rule.id;
            self.rule_form = RuleFormState::from_rule(rule);
            self.open_dialog(ActiveDialog::EditRule(id));
        }
    }

    /// Save the rule form
    pub fn submit_rule_form(&mut self) {
        if let Err(message) = self.rule_form.validate() {
            self.rule_form.set_error(message);
            return;
        }
        // A staged rule is hidden but still stored; it must not count as a duplicate
        self.commit_pending_removal();

        let service = RuleService::new(&self.storage);
        let (company, keyword, regex) = self.rule_form.values();

        let result = match self.active_dialog.clone() {
            ActiveDialog::EditRule(id) => service
                .update(
                    id,
                    RuleEdit {
                        company: Some(company),
                        code_keyword: Some(keyword),
                        code_regex: Some(regex),
                        enabled: None,
                    },
                )
                .map(|rule| {
                    if let Some(existing) = self.rules.iter_mut().find(|r| r.id == id) {
                        *existing = rule.clone();
                    }
                    format!("Updated {}", rule)
                }),
            _ => service.create(&company, &keyword, &regex).map(|rule| {
                let message = format!("Added {}", rule);
                self.rules.push(rule);
                self.selected_index = self.rules.len() - 1;
                message
            }),
        };

        match result {
            Ok(message) => {
                self.close_dialog();
                self.notify(Notification::success(message));
            }
            Err(e) => self.rule_form.set_error(e.to_string()),
        }
    }

    /// Enable or disable the selected rule
    pub fn toggle_selected(&mut self) {
        if self.refuse_if_busy() {
            return;
        }
        let Some(rule) = self.selected_rule() else {
            return;
        };

        let edit = RuleEdit {
            enabled: Some(!rule.enabled),
            ..Default::default()
        };
        match RuleService::new(&self.storage).update(rule.id, edit) {
            Ok(updated) => {
                let index = self.selected_index;
                self.rules[index] = updated;
            }
            Err(e) => self.notify(Notification::error(e.to_string())),
        }
    }

    // Export

    /// Open the export dialog with a default file name
    pub fn open_export(&mut self) {
        if self.refuse_if_busy() {
            return;
        }
        if self.rules.is_empty() {
            self.notify(Notification::warning("No rules to export"));
            return;
        }
        let filename = self.backup.default_backup_filename_today();
        self.export_form = ExportFormState::with_filename(filename);
        self.open_dialog(ActiveDialog::Export);
    }

    /// Start exporting to the file named in the export form
    pub fn submit_export(&mut self) {
        let filename = self.export_form.filename.value().to_string();
        if !is_valid_filename(&filename) {
            self.export_form.set_error("Invalid file name");
            return;
        }

        self.close_dialog();
        self.start_export(self.backup.backup_dir().join(filename));
    }

    /// Export the rule list in the background
    pub fn start_export(&mut self, destination: PathBuf) {
        if self.refuse_if_busy() {
            return;
        }
        self.commit_pending_removal();

        let rules = self.rules.clone();
        let target = destination.clone();
        let task = BackupTask::spawn("export", move || {
            BackupManager::export_rule_list(&target, &rules)
        });

        self.backup_job = Some(BackupJob::Export { task, destination });
    }

    // Import

    /// Open the backup file picker
    pub fn open_import(&mut self) {
        if self.refuse_if_busy() {
            return;
        }
        match self.backup.list_backup_files() {
            Ok(files) if files.is_empty() => {
                self.notify(Notification::info("No backup exists"));
            }
            Ok(files) => {
                self.import_picker = ImportPickerState::new(files);
                self.open_dialog(ActiveDialog::ImportPicker);
            }
            Err(e) => {
                warn!(error = %e, "failed to list backups");
                self.notify(Notification::error(format!("Failed to list backups: {}", e)));
            }
        }
    }

    /// Ask how to import the file chosen in the picker
    pub fn choose_import_file(&mut self) {
        if let Some(file) = self.import_picker.selected() {
            let path = file.path.clone();
            self.open_dialog(ActiveDialog::ImportMode(path));
        }
    }

    /// Ask how to import an arbitrary file
    pub fn request_direct_import(&mut self, source: PathBuf) {
        self.open_dialog(ActiveDialog::ImportMode(source));
    }

    /// Import a backup in the background
    pub fn start_import(&mut self, source: PathBuf, retain: bool) {
        self.close_dialog();
        if self.refuse_if_busy() {
            return;
        }
        self.commit_pending_removal();

        let storage = Arc::clone(&self.storage);
        let file = source.clone();
        let task = BackupTask::spawn("import", move || {
            BackupManager::import_rule_list(&file, retain, &storage)
        });

        self.backup_job = Some(BackupJob::Import { task, source });
    }

    // Background job completion

    fn poll_backup_job(&mut self) {
        let Some(job) = self.backup_job.as_mut() else {
            return;
        };

        match job {
            BackupJob::Export { task, .. } => {
                if let Some(result) = task.poll() {
                    self.backup_job = None;
                    self.on_export_complete(result);
                    return;
                }
            }
            BackupJob::Import { task, .. } => {
                if let Some(result) = task.poll() {
                    self.backup_job = None;
                    self.on_import_complete(result);
                    return;
                }
            }
        }

        if !job.is_pending() {
            self.backup_job = None;
            self.notify(Notification::error("Backup task stopped unexpectedly"));
        }
    }

    fn on_export_complete(&mut self, result: ExportResult) {
        self.notify(Notification::from(result));
    }

    fn on_import_complete(&mut self, result: ImportResult) {
        if result.is_success() {
            self.reload_rules();
        }
        self.notify(Notification::from(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SmsCodePaths;
    use std::thread;
    use tempfile::TempDir;

    fn create_test_app() -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SmsCodePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let service = RuleService::new(&storage);
        service.create("First", "code", r"\d{4}").unwrap();
        service.create("Second", "code", r"\d{4}").unwrap();
        service.create("Third", "code", r"\d{4}").unwrap();

        let settings = Settings {
            backup_dir: Some(temp_dir.path().join("backups")),
            ..Settings::default()
        };
        let app = App::new(Arc::new(storage), settings).unwrap();
        (temp_dir, app)
    }

    fn companies(rules: &[Rule]) -> Vec<String> {
        rules.iter().map(|r| r.company.clone()).collect()
    }

    fn wait_for_job(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.is_busy() && Instant::now() < deadline {
            app.tick();
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!app.is_busy());
    }

    #[test]
    fn test_navigation_bounds() {
        let (_temp_dir, mut app) = create_test_app();
        app.move_up();
        assert_eq!(app.selected_index, 0);
        for _ in 0..5 {
            app.move_down();
        }
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_undo_restores_position_without_touching_storage() {
        let (_temp_dir, mut app) = create_test_app();
        app.selected_index = 1;

        app.stage_removal();
        assert_eq!(companies(&app.rules), vec!["First", "Third"]);
        assert_eq!(app.storage.rules.count().unwrap(), 3);

        app.undo_removal();
        assert_eq!(companies(&app.rules), vec!["First", "Second", "Third"]);
        assert_eq!(app.selected_index, 1);
        assert!(app.pending_removal.is_none());
    }

    #[test]
    fn test_removal_commits_after_window() {
        let (_temp_dir, mut app) = create_test_app();
        app.undo_window = Duration::ZERO;

        app.stage_removal();
        app.tick();

        assert!(app.pending_removal.is_none());
        let stored = app.storage.rules.get_all().unwrap();
        assert_eq!(companies(&stored), vec!["Second", "Third"]);
    }

    #[test]
    fn test_second_removal_commits_first() {
        let (_temp_dir, mut app) = create_test_app();

        app.stage_removal();
        app.stage_removal();

        assert_eq!(app.storage.rules.count().unwrap(), 2);
        assert_eq!(companies(&app.rules), vec!["Third"]);

        app.undo_removal();
        assert_eq!(companies(&app.rules), vec!["Second", "Third"]);
    }

    #[test]
    fn test_shutdown_commits_pending_removal() {
        let (_temp_dir, mut app) = create_test_app();
        app.stage_removal();
        app.shutdown();
        assert_eq!(app.storage.rules.count().unwrap(), 2);
    }

    #[test]
    fn test_export_then_import_replace() {
        let (temp_dir, mut app) = create_test_app();

        app.open_export();
        assert_eq!(app.active_dialog, ActiveDialog::Export);
        app.submit_export();
        assert!(app.is_busy());
        wait_for_job(&mut app);

        let backup_dir = temp_dir.path().join("backups");
        let files = BackupManager::new(&backup_dir).list_backup_files().unwrap();
        assert_eq!(files.len(), 1);

        app.stage_removal();
        app.undo_window = Duration::ZERO;
        app.tick();
        assert_eq!(app.rules.len(), 2);

        app.open_import();
        assert_eq!(app.active_dialog, ActiveDialog::ImportPicker);
        app.choose_import_file();
        assert!(matches!(app.active_dialog, ActiveDialog::ImportMode(_)));

        app.start_import(files[0].path.clone(), false);
        wait_for_job(&mut app);

        assert_eq!(companies(&app.rules), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_backup_actions_refused_while_busy() {
        let (_temp_dir, mut app) = create_test_app();
        let blocker = BackupTask::spawn("export", || {
            thread::sleep(Duration::from_millis(50));
            ExportResult::Success
        });
        app.backup_job = Some(BackupJob::Export {
            task: blocker,
            destination: PathBuf::from("bak.scebak"),
        });

        app.open_import();
        app.stage_removal();

        assert_eq!(app.active_dialog, ActiveDialog::None);
        assert_eq!(app.rules.len(), 3);
        wait_for_job(&mut app);
    }

    #[test]
    fn test_import_failure_keeps_rules() {
        let (temp_dir, mut app) = create_test_app();
        let bad = temp_dir.path().join("bad.scebak");
        std::fs::write(&bad, r#"{"rules": []}"#).unwrap();

        app.request_direct_import(bad.clone());
        app.start_import(bad, false);
        wait_for_job(&mut app);

        assert_eq!(app.rules.len(), 3);
        let shown = app.notifications.current().unwrap();
        assert_eq!(shown.message, ImportResult::VersionMissed.message());
    }

    #[test]
    fn test_export_refused_when_empty() {
        let (_temp_dir, mut app) = create_test_app();
        app.undo_window = Duration::ZERO;
        for _ in 0..3 {
            app.stage_removal();
        }
        app.tick();

        app.open_export();
        assert_eq!(app.active_dialog, ActiveDialog::None);
        assert_eq!(
            app.notifications.current().unwrap().message,
            "No rules to export"
        );
    }

    #[test]
    fn test_import_with_no_backups() {
        let (_temp_dir, mut app) = create_test_app();
        app.open_import();
        assert_eq!(app.notifications.current().unwrap().message, "No backup exists");
    }

    #[test]
    fn test_add_rule_through_form() {
        let (_temp_dir, mut app) = create_test_app();
        app.open_add_rule();
        app.rule_form.company.set_value("Bank");
        app.rule_form.keyword.set_value("otp");
        app.rule_form.regex.set_value(r"(\d{6})");

        app.submit_rule_form();

        assert_eq!(app.active_dialog, ActiveDialog::None);
        assert_eq!(app.rules.last().unwrap().company, "Bank");
        assert_eq!(app.selected_index, 3);
        assert_eq!(app.storage.rules.count().unwrap(), 4);
    }

    #[test]
    fn test_re_adding_a_staged_rule_is_not_a_duplicate() {
        let (_temp_dir, mut app) = create_test_app();
        app.stage_removal();
        assert!(app.rules.iter().all(|r| r.company != "First"));

        app.open_add_rule();
        app.rule_form.company.set_value("First");
        app.rule_form.keyword.set_value("code");
        app.rule_form.regex.set_value(r"\d{4}");
        app.submit_rule_form();

        assert_eq!(app.active_dialog, ActiveDialog::None);
        assert!(app.pending_removal.is_none());
        assert_eq!(app.storage.rules.count().unwrap(), 3);
        assert_eq!(app.rules.last().unwrap().company, "First");
    }

    #[test]
    fn test_edit_rule_with_bad_regex_keeps_dialog_open() {
        let (_temp_dir, mut app) = create_test_app();
        app.open_edit_rule();
        app.rule_form.regex.set_value("(");

        app.submit_rule_form();

        assert!(matches!(app.active_dialog, ActiveDialog::EditRule(_)));
        assert!(app.rule_form.error_message.is_some());
    }
}
