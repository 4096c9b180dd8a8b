//! Export dialog
//!
//! Asks for the backup file name, prefilled with the default for today.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::backup::{is_valid_filename, BACKUP_FILE_EXTENSION};
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::input::TextInput;

/// State for the export dialog
#[derive(Debug, Clone, Default)]
pub struct ExportFormState {
    pub filename: TextInput,
    pub error_message: Option<String>,
}

impl ExportFormState {
    pub fn new() -> Self {
        Self {
            filename: TextInput::new().label("File"),
            error_message: None,
        }
    }

    /// Form prefilled with `filename`, cursor placed before the extension
    pub fn with_filename(filename: impl Into<String>) -> Self {
        let mut form = Self::new();
        form.filename.set_value(filename);
        let name = form.filename.value();
        if let Some(stem) = name.strip_suffix(BACKUP_FILE_EXTENSION) {
            form.filename.cursor = stem.chars().count();
        }
        form
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }

    /// Whether the current name can be saved
    pub fn is_valid(&self) -> bool {
        is_valid_filename(self.filename.value())
    }
}

/// Render the export dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect_fixed(60, 9, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Export Rules ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Directory
            Constraint::Length(1), // File name
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Buttons
            Constraint::Min(0),
        ])
        .split(inner);

    let directory = Line::from(vec![
        Span::styled("Into: ", Style::default().fg(Color::Cyan)),
        Span::raw(app.backup.backup_dir().display().to_string()),
    ]);
    frame.render_widget(Paragraph::new(directory), chunks[0]);

    let form = &mut app.export_form;
    form.filename.focused = true;
    frame.render_widget(&form.filename, chunks[1]);

    let error = form
        .error_message
        .clone()
        .or_else(|| (!form.is_valid()).then(|| "Invalid file name".to_string()));
    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(Span::styled(error, Style::default().fg(Color::Red))),
            chunks[3],
        );
    }

    let save_style = if form.is_valid() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let hints = Line::from(vec![
        Span::styled("[Enter]", save_style),
        Span::raw(" Export  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[4]);
}

/// Handle key input for the export dialog
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.submit_export(),
        _ => {
            if !app.export_form.filename.handle_key(key) {
                return false;
            }
            app.export_form.error_message = None;
        }
    }
    true
}
