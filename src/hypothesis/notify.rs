//! Failure notifications
//!
//! The client reports user-facing failures as [`Notice`] events through an
//! injected [`Notifier`]; rendering them is left to the caller.

use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Error,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    pub title: String,
    pub content: String,
}

impl Notice {
    pub fn error(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Sink for notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<F> Notifier for F
where
    F: Fn(Notice) + Send + Sync,
{
    fn notify(&self, notice: Notice) {
        self(notice)
    }
}

/// Writes notices to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::error!(title = %notice.title, "{}", notice.content),
            NoticeKind::Warning => tracing::warn!(title = %notice.title, "{}", notice.content),
            NoticeKind::Info | NoticeKind::Success => {
                tracing::info!(title = %notice.title, "{}", notice.content)
            }
        }
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Drain collected notices
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    pub fn len(&self) -> usize {
        self.notices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.lock().is_empty()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
