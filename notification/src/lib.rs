//! Short, fire-and-forget user notices.
//!
//! The reconciler reports grant and deny outcomes through a [`Notifier`].
//! Notices are informational only: a backend that fails to show one logs
//! the failure and carries on.

#![warn(missing_docs)]

/// Platform-specific implementations.
pub mod sys;

use std::sync::{Mutex, PoisonError};

use log::info;
use thiserror::Error;

#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
pub use sys::SystemNotifier;

/// How long a notice stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoticeLength {
    /// A brief confirmation.
    #[default]
    Short,
    /// A message the user needs time to read, such as settings advice.
    Long,
}

/// A short text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    text: String,
    length: NoticeLength,
}

impl Notice {
    /// Create a notice with the default short length.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            length: NoticeLength::Short,
        }
    }

    /// Create a short notice.
    pub fn short(text: impl Into<String>) -> Self {
        Self::new(text)
    }

    /// Create a long notice.
    pub fn long(text: impl Into<String>) -> Self {
        Self::new(text).length(NoticeLength::Long)
    }

    /// Set how long the notice stays on screen.
    #[must_use]
    pub const fn length(mut self, length: NoticeLength) -> Self {
        self.length = length;
        self
    }

    /// The notice text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The display length.
    #[must_use]
    pub const fn display_length(&self) -> NoticeLength {
        self.length
    }
}

/// Errors raised by notification backends.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// The platform refused or failed to show the notice.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Destination for user notices.
pub trait Notifier {
    /// Show `notice`. Never blocks on user interaction.
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Writes notices to the log instead of the screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        info!("notice ({:?}): {}", notice.length, notice.text);
    }
}

/// Discards every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Keeps every notice it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Texts of the notices received so far.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.notices().into_iter().map(|notice| notice.text).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_length() {
        let notice = Notice::long("Open settings");
        assert_eq!(notice.text(), "Open settings");
        assert_eq!(notice.display_length(), NoticeLength::Long);
        assert_eq!(Notice::new("ok").display_length(), NoticeLength::Short);
    }

    #[test]
    fn recorder_keeps_order() {
        let recorder = RecordingNotifier::new();
        let shared = &recorder;
        shared.notify(Notice::short("first"));
        shared.notify(Notice::long("second"));

        assert_eq!(recorder.texts(), vec!["first", "second"]);
        assert_eq!(recorder.notices()[1].display_length(), NoticeLength::Long);
    }
}
