//! Help dialog
//!
//! Shows keyboard shortcuts

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::centered_rect;

/// Render the help dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines(app))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn help_lines(app: &App) -> Vec<Line<'static>> {
    vec![
        section("Rules"),
        Line::from(""),
        key_line("j/k", "Move selection down/up"),
        key_line("a", "Add a rule"),
        key_line("e / Enter", "Edit the selected rule"),
        key_line("Space", "Enable or disable the selected rule"),
        key_line("d / Del", "Remove the selected rule"),
        key_line(
            "u",
            format!("Undo the last removal (within {}s)", app.undo_window.as_secs()),
        ),
        Line::from(""),
        section("Backup"),
        Line::from(""),
        key_line("x", "Export rules to a backup file"),
        key_line("i", "Import rules from a backup file"),
        Line::from(""),
        section("General"),
        Line::from(""),
        key_line("?", "Show/hide help"),
        key_line("q", "Quit"),
    ]
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    ))
}

fn key_line(key: &'static str, description: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:12}", key), Style::default().fg(Color::Cyan)),
        Span::raw(description.into()),
    ])
}
