//! Toast shown over the rule list
//!
//! One toast is visible at a time and a newer one replaces it. Backup
//! outcomes map one-to-one onto toasts; a removal toast lives exactly as long
//! as its undo window and counts down in its title.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::backup::{ExportResult, ImportResult};
use crate::models::Rule;

const DEFAULT_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Info => "Note",
            Self::Success => "Done",
            Self::Warning => "Wait",
            Self::Error => "Failed",
        }
    }
}

/// A message with a lifetime
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
    lifetime: Duration,
    undo_prompt: bool,
}

impl Notification {
    fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            shown_at: Instant::now(),
            lifetime: DEFAULT_LIFETIME,
            undo_prompt: false,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    /// Offer to undo the removal of `rule` for `window`
    pub fn removal(rule: &Rule, window: Duration) -> Self {
        Self {
            lifetime: window,
            undo_prompt: true,
            ..Self::info(format!("Removed {}. Press u to undo", rule))
        }
    }

    pub fn is_undo_prompt(&self) -> bool {
        self.undo_prompt
    }

    pub fn remaining(&self) -> Duration {
        self.lifetime.saturating_sub(self.shown_at.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

impl From<ExportResult> for Notification {
    fn from(result: ExportResult) -> Self {
        match result {
            ExportResult::Success => Self::success(result.message()),
            ExportResult::Failed => Self::error(result.message()),
        }
    }
}

impl From<ImportResult> for Notification {
    fn from(result: ImportResult) -> Self {
        if result.is_success() {
            Self::success(result.message())
        } else {
            Self::error(result.message())
        }
    }
}

/// The toast slot
#[derive(Debug, Default)]
pub struct Notifications {
    current: Option<Notification>,
}

impl Notifications {
    /// Show `notification` in place of whatever was showing
    pub fn show(&mut self, notification: Notification) {
        self.current = Some(notification);
    }

    /// The toast to draw, if it is still live
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().filter(|n| !n.is_expired())
    }

    /// Drop the toast once its lifetime is over
    pub fn expire(&mut self) {
        if self.current.as_ref().is_some_and(Notification::is_expired) {
            self.current = None;
        }
    }

    /// Drop an undo prompt whose removal was undone or committed
    pub fn dismiss_undo_prompt(&mut self) {
        if self.current.as_ref().is_some_and(Notification::is_undo_prompt) {
            self.current = None;
        }
    }
}

pub struct NotificationWidget<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationWidget<'a> {
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }
}

impl Widget for NotificationWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let severity = self.notification.severity;
        let title = if self.notification.is_undo_prompt() {
            format!(" Undo {}s ", self.notification.remaining().as_secs() + 1)
        } else {
            format!(" {} ", severity.title())
        };

        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(severity.color()))
            .title(title)
            .title_style(
                Style::default()
                    .fg(severity.color())
                    .add_modifier(Modifier::BOLD),
            );

        Paragraph::new(self.notification.message.as_str())
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_toast_replaces_older() {
        let mut toasts = Notifications::default();
        toasts.show(Notification::info("First"));
        toasts.show(Notification::warning("Second"));

        let shown = toasts.current().unwrap();
        assert_eq!(shown.message, "Second");
        assert_eq!(shown.severity, Severity::Warning);
    }

    #[test]
    fn test_outcomes_map_to_severity() {
        assert_eq!(
            Notification::from(ExportResult::Failed).severity,
            Severity::Error
        );
        let imported = Notification::from(ImportResult::Success);
        assert_eq!(imported.severity, Severity::Success);
        assert_eq!(imported.message, ImportResult::Success.message());
        assert_eq!(
            Notification::from(ImportResult::VersionUnknown).message,
            ImportResult::VersionUnknown.message()
        );
    }

    #[test]
    fn test_removal_lives_for_undo_window() {
        let rule = Rule::new("Acme", "code", r"\d{6}");
        let toast = Notification::removal(&rule, Duration::from_secs(5));

        assert!(toast.is_undo_prompt());
        assert!(toast.remaining() > Duration::from_secs(4));
        assert!(Notification::removal(&rule, Duration::ZERO).is_expired());
    }

    #[test]
    fn test_dismiss_only_touches_undo_prompt() {
        let rule = Rule::new("Acme", "code", r"\d{6}");
        let mut toasts = Notifications::default();

        toasts.show(Notification::error("Export failed"));
        toasts.dismiss_undo_prompt();
        assert!(toasts.current().is_some());

        toasts.show(Notification::removal(&rule, Duration::from_secs(5)));
        toasts.dismiss_undo_prompt();
        assert!(toasts.current().is_none());
    }

    #[test]
    fn test_expired_toast_is_dropped() {
        let rule = Rule::new("Acme", "code", r"\d{6}");
        let mut toasts = Notifications::default();
        toasts.show(Notification::removal(&rule, Duration::ZERO));
        assert!(toasts.current().is_none());

        toasts.expire();
        assert!(toasts.current.is_none());
    }
}
