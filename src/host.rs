//! Host capabilities consumed by the anonymize and revert commands.

use crate::error::Result;
use std::fmt;

/// Severity of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeKind::Info => write!(f, "info"),
            NoticeKind::Warning => write!(f, "warning"),
            NoticeKind::Error => write!(f, "error"),
        }
    }
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub detail: Option<String>,
}

/// The editing environment the commands run in.
pub trait Host {
    /// The current selection, or `None` when there is nothing to select from.
    fn selected_text(&mut self) -> Result<Option<String>>;

    /// Overwrite the current selection.
    fn replace_selected_text(&mut self, text: &str) -> Result<()>;

    /// Show a message to the user.
    fn notify(&mut self, kind: NoticeKind, message: &str, detail: Option<&str>);

    /// Surface text for the user to copy.
    fn display_output(&mut self, text: &str) -> Result<()>;
}

/// In-memory host that records everything the commands do.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    /// Current selection (`None` = no active context)
    pub selection: Option<String>,
    /// Notices in the order they were shown
    pub notices: Vec<Notice>,
    /// Latest displayed output
    pub output: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(text: impl Into<String>) -> Self {
        Self {
            selection: Some(text.into()),
            ..Self::default()
        }
    }

    /// The most recent notice.
    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl Host for RecordingHost {
    fn selected_text(&mut self) -> Result<Option<String>> {
        Ok(self.selection.clone())
    }

    fn replace_selected_text(&mut self, text: &str) -> Result<()> {
        self.selection = Some(text.to_string());
        Ok(())
    }

    fn notify(&mut self, kind: NoticeKind, message: &str, detail: Option<&str>) {
        self.notices.push(Notice {
            kind,
            message: message.to_string(),
            detail: detail.map(str::to_string),
        });
    }

    fn display_output(&mut self, text: &str) -> Result<()> {
        self.output = Some(text.to_string());
        Ok(())
    }
}
