//! Rule list view
//!
//! The rules in list order with the selected row highlighted.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::rule::truncate;
use crate::tui::app::App;

/// Render the rule list
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(format!(" Rules ({}) ", app.rules.len()))
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.rules.is_empty() {
        let text = Paragraph::new("No rules yet. Press 'a' to add one or 'i' to import a backup.")
            .block(block)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(40),
        Constraint::Length(3),
    ];

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("#").style(bold),
        Cell::from("Company").style(bold),
        Cell::from("Keyword").style(bold),
        Cell::from("Regex").style(bold),
        Cell::from("On").style(bold),
    ])
    .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = app
        .rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let style = if rule.enabled {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(truncate(&rule.company, 30)),
                Cell::from(truncate(&rule.code_keyword, 30)),
                Cell::from(truncate(&rule.code_regex, 48)),
                Cell::from(if rule.enabled { "x" } else { "" }),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}
