//! Transient notification banner
//!
//! A notification is shown with a deadline. Showing a new message replaces
//! the deadline, so an older timer can never hide a newer message.

use ratatui::{
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Duration;
use tokio::time::Instant;

use crate::tui::ui::Styles;

/// Older messages kept once replaced
const MAX_HISTORY: usize = 50;

/// Outcome a notification reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A message with its kind and wall-clock time
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl NoticeKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            NoticeKind::Success => "✓",
            NoticeKind::Error => "✗",
        }
    }
}

impl Notice {
    pub fn new(message: &str, kind: NoticeKind) -> Self {
        Self {
            message: message.to_string(),
            kind,
            timestamp: chrono::Local::now(),
        }
    }
}

/// Self-dismissing notification display
#[derive(Debug)]
pub struct Notification {
    current: Option<Notice>,
    visible: bool,
    hide_at: Option<Instant>,
    delay: Duration,
    history: Vec<Notice>,
}

impl Notification {
    pub fn new(delay: Duration) -> Self {
        Self {
            current: None,
            visible: false,
            hide_at: None,
            delay,
            history: Vec::new(),
        }
    }

    /// Show a message and (re)start the hide timer
    pub fn show(&mut self, message: &str, kind: NoticeKind, now: Instant) {
        if let Some(previous) = self.current.take() {
            self.history.push(previous);
            if self.history.len() > MAX_HISTORY {
                self.history.remove(0);
            }
        }

        self.current = Some(Notice::new(message, kind));
        self.visible = true;
        self.hide_at = Some(now + self.delay);
    }

    pub fn success(&mut self, message: &str, now: Instant) {
        self.show(message, NoticeKind::Success, now);
    }

    pub fn error(&mut self, message: &str, now: Instant) {
        self.show(message, NoticeKind::Error, now);
    }

    /// Hide the message once its deadline has passed. Returns true when
    /// this call hid it.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if self.visible && now >= deadline => {
                self.visible = false;
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }

    /// Hide immediately and forget the timer
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.hide_at = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Message currently shown, if visible
    pub fn message(&self) -> Option<&str> {
        if self.visible {
            self.current.as_ref().map(|notice| notice.message.as_str())
        } else {
            None
        }
    }

    pub fn kind(&self) -> Option<NoticeKind> {
        if self.visible {
            self.current.as_ref().map(|notice| notice.kind)
        } else {
            None
        }
    }

    /// Messages shown so far, newest first, including one already hidden
    fn recent(&self) -> impl Iterator<Item = &Notice> {
        self.current.iter().chain(self.history.iter().rev())
    }

    /// One line per notice, e.g. `12:30:01 ✓ Category updated successfully!`
    pub fn recent_lines(&self, limit: usize) -> Vec<String> {
        self.recent()
            .take(limit)
            .map(|notice| {
                format!(
                    "{} {} {}",
                    notice.timestamp.format("%H:%M:%S"),
                    notice.kind.symbol(),
                    notice.message
                )
            })
            .collect()
    }

    /// Render the banner; nothing is drawn while hidden
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let Some(notice) = self.current.as_ref().filter(|_| self.visible) else {
            return;
        };

        let style = match notice.kind {
            NoticeKind::Success => Styles::success(),
            NoticeKind::Error => Styles::error(),
        };

        let text = format!(
            "{} [{}] {}",
            notice.kind.symbol(),
            notice.timestamp.format("%H:%M:%S"),
            notice.message
        );

        let banner = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style),
            );

        f.render_widget(banner, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_hides_after_delay() {
        let start = Instant::now();
        let mut notification = Notification::new(Duration::from_secs(4));
        notification.success("Category submitted successfully!", start);

        assert!(!notification.tick(start + Duration::from_millis(3999)));
        assert_eq!(notification.message(), Some("Category submitted successfully!"));
        assert_eq!(notification.kind(), Some(NoticeKind::Success));

        assert!(notification.tick(start + Duration::from_secs(4)));
        assert_eq!(notification.message(), None);
        assert!(!notification.tick(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_newer_message_restarts_timer() {
        let start = Instant::now();
        let mut notification = Notification::new(Duration::from_secs(3));
        notification.error("first", start);
        notification.success("second", start + Duration::from_secs(2));

        // the first message's deadline has passed, the second's has not
        assert!(!notification.tick(start + Duration::from_secs(3)));
        assert_eq!(notification.message(), Some("second"));
        assert!(notification.tick(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_history_is_bounded() {
        let start = Instant::now();
        let mut notification = Notification::new(Duration::from_secs(1));
        for i in 0..MAX_HISTORY + 3 {
            notification.success(&format!("message {}", i), start);
        }

        let history = &notification.history;
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history[0].message, "message 2");
        assert_eq!(history[MAX_HISTORY - 1].message, format!("message {}", MAX_HISTORY + 1));
    }

    #[test]
    fn test_recent_lists_newest_first_after_hiding() {
        let start = Instant::now();
        let mut notification = Notification::new(Duration::from_secs(3));
        notification.error("Error uploading file.", start);
        notification.success("Excel file uploaded successfully!", start);
        notification.tick(start + Duration::from_secs(3));
        assert!(!notification.is_visible());

        let lines = notification.recent_lines(5);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("✓ Excel file uploaded successfully!"));
        assert!(lines[1].ends_with("✗ Error uploading file."));
        assert_eq!(notification.recent_lines(1).len(), 1);
    }
}
