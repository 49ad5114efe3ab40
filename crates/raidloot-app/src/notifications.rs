//! Toast notification queue
//!
//! A frontend-agnostic queue of transient messages. The core pushes toasts
//! when actions succeed or fail; shells subscribe to the signal and decide
//! how to draw them. Auto-dismiss timing also lives with the shell; the
//! queue only says whether a toast *should* expire on its own.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_signals::signal::{Mutable, Signal};

use crate::errors::AppError;

/// How long an auto-dismissed toast stays visible, in milliseconds.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 4_000;

/// Queue capacity; the oldest toasts are dropped beyond this.
pub const MAX_PENDING_TOASTS: usize = 8;

/// Severity of a toast, which drives color and dismissal behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    /// Neutral information
    Info,
    /// Completed action
    Success,
    /// Something degraded but the app still works
    Warning,
    /// Something failed; stays until dismissed
    Error,
}

/// Whether a toast of this level should disappear on its own.
///
/// Errors require an explicit dismissal so they cannot be missed.
#[must_use]
pub fn should_auto_dismiss(level: ToastLevel) -> bool {
    level != ToastLevel::Error
}

/// One queued notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Queue-unique id, for dismissal.
    pub id: u64,
    /// Severity.
    pub level: ToastLevel,
    /// Text to show.
    pub message: String,
    /// Whether the shell should expire it after
    /// [`DEFAULT_TOAST_DURATION_MS`].
    pub auto_dismiss: bool,
}

/// The shared toast queue.
///
/// Cheap to clone handles are not needed. The queue lives in an `Arc`
/// owned by the application core and is shared by reference.
#[derive(Debug, Default)]
pub struct Notifications {
    next_id: AtomicU64,
    toasts: Mutable<Vec<Toast>>,
}

impl Notifications {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast and return its id.
    pub fn push(&self, level: ToastLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            level,
            message: message.into(),
            auto_dismiss: should_auto_dismiss(level),
        };
        let mut toasts = self.toasts.lock_mut();
        toasts.push(toast);
        let overflow = toasts.len().saturating_sub(MAX_PENDING_TOASTS);
        if overflow > 0 {
            toasts.drain(..overflow);
        }
        id
    }

    /// Queue an info toast.
    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Info, message)
    }

    /// Queue a success toast.
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Success, message)
    }

    /// Queue a warning toast.
    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Warning, message)
    }

    /// Queue an error toast.
    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Error, message)
    }

    /// Queue a toast for an application error, at the severity the error
    /// itself asks for and with its user-facing message.
    pub fn notify_app_error(&self, error: &AppError) -> u64 {
        self.push(error.toast_level(), error.user_message())
    }

    /// Remove a toast by id. Returns whether it was still queued.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut toasts = self.toasts.lock_mut();
        let before = toasts.len();
        toasts.retain(|toast| toast.id != id);
        toasts.len() != before
    }

    /// Drop everything, e.g. on logout.
    pub fn clear(&self) {
        self.toasts.lock_mut().clear();
    }

    /// Current queue contents, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.get_cloned()
    }

    /// Reactive view of the queue. Emits the current contents immediately,
    /// then again on every change.
    pub fn signal(&self) -> impl Signal<Item = Vec<Toast>> {
        self.toasts.signal_cloned()
    }
}
