//! Status bar view
//!
//! Shows the running backup job, the undo countdown and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::App;

/// Render the status bar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} rule(s) ", app.rules.len()),
        Style::default().fg(Color::White),
    )];

    if let Some(job) = &app.backup_job {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{}...", job.describe()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(pending) = &app.pending_removal {
        let remaining = pending.remaining(app.undo_window).as_secs() + 1;
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("Removed {} (u: undo, {}s)", pending.rule, remaining),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hints = " a:Add  d:Remove  x:Export  i:Import  ?:Help  q:Quit ";

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
