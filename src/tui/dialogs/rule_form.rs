//! Rule entry dialog
//!
//! Modal form for adding a rule or editing the selected one.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use regex::Regex;

use crate::models::Rule;
use crate::tui::app::{ActiveDialog, App};
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::input::TextInput;

/// Which field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleField {
    #[default]
    Company,
    Keyword,
    Regex,
}

impl RuleField {
    fn next(self) -> Self {
        match self {
            Self::Company => Self::Keyword,
            Self::Keyword => Self::Regex,
            Self::Regex => Self::Company,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Company => Self::Regex,
            Self::Keyword => Self::Company,
            Self::Regex => Self::Keyword,
        }
    }
}

/// State for the rule form dialog
#[derive(Debug, Clone, Default)]
pub struct RuleFormState {
    pub company: TextInput,
    pub keyword: TextInput,
    pub regex: TextInput,
    pub focused: RuleField,
    pub error_message: Option<String>,
}

impl RuleFormState {
    /// Empty form
    pub fn new() -> Self {
        Self {
            company: TextInput::new()
                .label("Company")
                .placeholder("Sender or company name"),
            keyword: TextInput::new()
                .label("Keyword")
                .placeholder("e.g. verification code"),
            regex: TextInput::new()
                .label("Regex")
                .placeholder(r"e.g. (\d{6})"),
            focused: RuleField::Company,
            error_message: None,
        }
    }

    /// Form prefilled from a rule
    pub fn from_rule(rule: &Rule) -> Self {
        let mut form = Self::new();
        form.company.set_value(rule.company.clone());
        form.keyword.set_value(rule.code_keyword.clone());
        form.regex.set_value(rule.code_regex.clone());
        form
    }

    fn input_mut(&mut self) -> &mut TextInput {
        match self.focused {
            RuleField::Company => &mut self.company,
            RuleField::Keyword => &mut self.keyword,
            RuleField::Regex => &mut self.regex,
        }
    }

    /// Trimmed company, keyword and regex
    pub fn values(&self) -> (String, String, String) {
        (
            self.company.value().trim().to_string(),
            self.keyword.value().trim().to_string(),
            self.regex.value().trim().to_string(),
        )
    }

    /// Validate the form and return any error
    pub fn validate(&self) -> Result<(), String> {
        let (company, keyword, regex) = self.values();
        for (label, value) in [("Company", &company), ("Keyword", &keyword), ("Regex", &regex)] {
            if value.is_empty() {
                return Err(format!("{} is required", label));
            }
        }
        Regex::new(&regex).map_err(|_| "Regex does not compile".to_string())?;
        Ok(())
    }

    /// Clear any error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }
}

/// Render the rule dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect_fixed(64, 10, frame.area());
    frame.render_widget(Clear, area);

    let title = match app.active_dialog {
        ActiveDialog::EditRule(_) => " Edit Rule ",
        _ => " Add Rule ",
    };

    let block = Block::default()
        .title(title)
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
            Constraint::Length(1), // Company
            Constraint::Length(1), // Keyword
            Constraint::Length(1), // Regex
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Buttons
            Constraint::Min(0),
        ])
        .split(inner);

    let form = &mut app.rule_form;
    form.company.focused = form.focused == RuleField::Company;
    form.keyword.focused = form.focused == RuleField::Keyword;
    form.regex.focused = form.focused == RuleField::Regex;

    frame.render_widget(&form.company, chunks[0]);
    frame.render_widget(&form.keyword, chunks[1]);
    frame.render_widget(&form.regex, chunks[2]);

    if let Some(error) = &form.error_message {
        let error_line = Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(error_line), chunks[4]);
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Next field  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[5]);
}

/// Handle key input for the rule dialog
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.submit_rule_form(),
        KeyCode::Tab | KeyCode::Down => app.rule_form.focused = app.rule_form.focused.next(),
        KeyCode::BackTab | KeyCode::Up => app.rule_form.focused = app.rule_form.focused.prev(),
        _ => {
            let form = &mut app.rule_form;
            if !form.input_mut().handle_key(key) {
                return false;
            }
            form.clear_error();
        }
    }
    true
}
