//! Transient toast messages shown one at a time.
//!
//! `show` enqueues; a message becomes visible only when nothing else is.
//! Transitions return the duration of a newly visible message so the caller
//! can schedule the matching `hide` on a timer.

#[cfg(test)]
#[path = "snackbar_test.rs"]
mod snackbar_test;

use std::collections::VecDeque;

pub const DEFAULT_DURATION_MS: u32 = 3_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnackbarKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl SnackbarKind {
    /// CSS modifier for the snackbar element.
    pub fn class(self) -> &'static str {
        match self {
            SnackbarKind::Info => "snackbar--info",
            SnackbarKind::Success => "snackbar--success",
            SnackbarKind::Warning => "snackbar--warning",
            SnackbarKind::Error => "snackbar--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnackbarMessage {
    pub message: String,
    pub kind: SnackbarKind,
    pub duration_ms: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnackbarState {
    pub queue: VecDeque<SnackbarMessage>,
    pub current: Option<SnackbarMessage>,
    pub visible: bool,
}

impl SnackbarState {
    /// Enqueues a message. Returns its duration if it became visible now.
    pub fn show(&mut self, message: impl Into<String>, kind: SnackbarKind, duration_ms: u32) -> Option<u32> {
        self.queue.push_back(SnackbarMessage {
            message: message.into(),
            kind,
            duration_ms,
        });
        self.process_queue()
    }

    /// Hides the current message and promotes the next queued one.
    pub fn hide(&mut self) -> Option<u32> {
        self.visible = false;
        self.process_queue()
    }

    fn process_queue(&mut self) -> Option<u32> {
        if self.visible {
            return None;
        }
        let next = self.queue.pop_front()?;
        let duration = next.duration_ms;
        self.current = Some(next);
        self.visible = true;
        Some(duration)
    }
}
