//! Status presenter
//!
//! Transient messages with a severity tag, rendered into a display region.
//! Success messages auto-clear after a fixed delay; everything else stays
//! until replaced.

use ratatui::style::Color;
use std::time::{Duration, Instant};

/// How long a success message stays on screen before auto-clearing
pub const SUCCESS_TTL: Duration = Duration::from_secs(5);

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Loading,
    Info,
}

impl Severity {
    /// Visual indicator paired with the message text
    pub fn glyph(self) -> &'static str {
        match self {
            Severity::Success => "✔",
            Severity::Error => "✖",
            Severity::Loading => "⟳",
            Severity::Info => "ℹ",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Severity::Success => Color::Green,
            Severity::Error => Color::Red,
            Severity::Loading | Severity::Info => Color::Blue,
        }
    }
}

/// A transient message shown in a display region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }

    pub fn loading(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Loading,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }
}

/// A display region holding at most one status message
#[derive(Debug, Default)]
pub struct StatusRegion {
    current: Option<(StatusMessage, Instant)>,
}

impl StatusRegion {
    /// Replace whatever the region currently shows
    pub fn set(&mut self, message: StatusMessage) {
        self.current = Some((message, Instant::now()));
    }

    /// The currently displayed message, if any
    pub fn message(&self) -> Option<&StatusMessage> {
        self.current.as_ref().map(|(message, _)| message)
    }

    /// Clear a success message once it has been shown for `SUCCESS_TTL`.
    /// Other severities persist until explicitly replaced.
    pub fn expire(&mut self, now: Instant) {
        if let Some((message, posted)) = &self.current {
            if message.severity == Severity::Success && now.duration_since(*posted) >= SUCCESS_TTL {
                self.current = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_auto_clears() {
        let mut region = StatusRegion::default();
        region.set(StatusMessage::success("done"));
        assert!(region.message().is_some());

        region.expire(Instant::now() + SUCCESS_TTL);
        assert!(region.message().is_none());
    }

    #[test]
    fn test_success_persists_before_ttl() {
        let mut region = StatusRegion::default();
        region.set(StatusMessage::success("done"));

        region.expire(Instant::now());
        assert!(region.message().is_some());
    }

    #[test]
    fn test_error_persists_past_ttl() {
        let mut region = StatusRegion::default();
        region.set(StatusMessage::error("broken"));

        region.expire(Instant::now() + SUCCESS_TTL * 2);
        assert_eq!(region.message().unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_set_overwrites() {
        let mut region = StatusRegion::default();
        region.set(StatusMessage::loading("working..."));
        region.set(StatusMessage::error("failed"));

        assert_eq!(region.message().unwrap().text, "failed");
    }
}
