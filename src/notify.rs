//! Shared toast notifications.
//!
//! Every view reports outcomes through a [`Notifier`] with the same
//! `{title, message, kind}` shape. The terminal implementation, [`Toaster`],
//! prints each notice once and keeps it as the visible toast for a fixed
//! display window; a newer notice replaces it.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use console::{Term, style};

use crate::ui::icons::{CHECK, CROSS, INFO};

/// How long a toast stays visible.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }
}

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Debug, Clone)]
struct Toast {
    notice: Notice,
    shown_at: Instant,
}

/// Terminal notifier writing styled one-line toasts to stderr.
pub struct Toaster {
    term: Term,
    duration: Duration,
    current: Mutex<Option<Toast>>,
}

impl Toaster {
    pub fn new(duration: Duration) -> Self {
        Self {
            term: Term::stderr(),
            duration,
            current: Mutex::new(None),
        }
    }

    /// The toast still inside its display window, if any.
    pub fn visible(&self) -> Option<Notice> {
        self.visible_at(Instant::now())
    }

    fn visible_at(&self, now: Instant) -> Option<Notice> {
        let current = self.current.lock().ok()?;
        current
            .as_ref()
            .filter(|t| now.saturating_duration_since(t.shown_at) < self.duration)
            .map(|t| t.notice.clone())
    }

    fn render(notice: &Notice) -> String {
        let (icon, title) = match notice.kind {
            NoticeKind::Success => (&CHECK, style(notice.title.as_str()).green().bold()),
            NoticeKind::Error => (&CROSS, style(notice.title.as_str()).red().bold()),
            NoticeKind::Info => (&INFO, style(notice.title.as_str()).blue().bold()),
        };
        format!("{}{}  {}", icon, title, notice.message)
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(TOAST_DURATION)
    }
}

impl Notifier for Toaster {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::warn!(title = %notice.title, message = %notice.message, "notice"),
            _ => tracing::debug!(title = %notice.title, message = %notice.message, "notice"),
        }
        if self.term.write_line(&Self::render(&notice)).is_err() {
            eprintln!("{}: {}", notice.title, notice.message);
        }
        if let Ok(mut current) = self.current.lock() {
            *current = Some(Toast {
                notice,
                shown_at: Instant::now(),
            });
        }
    }
}

/// Notifier that keeps every notice, for assertions in tests.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().unwrap().last().cloned()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
