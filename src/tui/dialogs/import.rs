//! Import dialogs
//!
//! A picker over the files in the backup directory, and the question of
//! whether to keep the current rules.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::path::Path;

use crate::backup::BackupFileInfo;
use crate::display::format_size;
use crate::tui::app::App;
use crate::tui::layout::{centered_rect, centered_rect_fixed};

/// State for the backup file picker
#[derive(Debug, Clone, Default)]
pub struct ImportPickerState {
    pub files: Vec<BackupFileInfo>,
    pub selected_index: usize,
}

impl ImportPickerState {
    pub fn new(files: Vec<BackupFileInfo>) -> Self {
        Self {
            files,
            selected_index: 0,
        }
    }

    pub fn selected(&self) -> Option<&BackupFileInfo> {
        self.files.get(self.selected_index)
    }

    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.files.len() {
            self.selected_index += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }
}

/// Render the backup file picker
pub fn render_picker(frame: &mut Frame, app: &mut App) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Import Rules ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .title_bottom(" [Enter] Import  [Esc] Cancel ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let items: Vec<ListItem> = app
        .import_picker
        .files
        .iter()
        .map(|file| {
            ListItem::new(Line::from(vec![
                Span::raw(file.filename.clone()),
                Span::styled(
                    format!("  {}", format_size(file.size_bytes)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.import_picker.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the keep-or-replace question
pub fn render_mode(frame: &mut Frame, source: &Path) {
    let area = centered_rect_fixed(60, 9, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Import ")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    let lines = vec![
        Line::from(Span::styled(
            format!("Import rules from {}", name),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from("Keep the current rules?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(Color::Green)),
            Span::raw(" Keep and merge  "),
            Span::styled("[N]", Style::default().fg(Color::Red)),
            Span::raw(" Replace  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Handle key input for the picker
pub fn handle_picker_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Char('j') | KeyCode::Down => app.import_picker.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.import_picker.move_up(),
        KeyCode::Enter => app.choose_import_file(),
        _ => return false,
    }
    true
}

/// Handle key input for the keep-or-replace question
pub fn handle_mode_key(app: &mut App, source: &Path, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.start_import(source.to_path_buf(), true),
        KeyCode::Char('n') | KeyCode::Char('N') => app.start_import(source.to_path_buf(), false),
        KeyCode::Esc => app.close_dialog(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn info(name: &str) -> BackupFileInfo {
        BackupFileInfo {
            filename: name.to_string(),
            path: PathBuf::from(name),
            size_bytes: 10,
            modified: None,
        }
    }

    #[test]
    fn test_picker_navigation() {
        let mut picker = ImportPickerState::new(vec![info("a.scebak"), info("b.scebak")]);
        picker.move_up();
        assert_eq!(picker.selected().unwrap().filename, "a.scebak");
        picker.move_down();
        picker.move_down();
        assert_eq!(picker.selected().unwrap().filename, "b.scebak");
    }
}
