//! # Mutation Actions
//!
//! An [`Action`] wraps one-shot mutations (create party, join, change
//! password) with `{loading, error}` tracking, toast routing, and optional
//! success/failure callbacks. The failure is always returned to the caller
//! as well, so submission sequences can stop on error.
//!
//! Actions are deliberately unguarded: starting a run while another is in
//! flight is allowed, and the loading flag simply tracks the most recent
//! transition. Preventing double-submission is the presentation layer's
//! job: disable the triggering control while `loading` is true (the
//! `can_submit_*` helpers in [`crate::workflows`] fold this in).

use std::future::Future;
use std::sync::Arc;

use futures_signals::signal::{Mutable, Signal};

use crate::errors::AppError;
use crate::notifications::Notifications;
use crate::session::Session;

/// Observable state of one action.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    /// Whether a run is in flight.
    pub loading: bool,
    /// Error of the most recent failed run, cleared when the next starts.
    pub error: Option<AppError>,
}

/// Per-run configuration. Everything is independently optional.
pub struct ActionOptions<R> {
    success_message: Option<String>,
    error_message: Option<String>,
    on_success: Option<Box<dyn Fn(&R) + Send + Sync>>,
    on_error: Option<Box<dyn Fn(&AppError) + Send + Sync>>,
}

impl<R> Default for ActionOptions<R> {
    fn default() -> Self {
        Self {
            success_message: None,
            error_message: None,
            on_success: None,
            on_error: None,
        }
    }
}

impl<R> ActionOptions<R> {
    /// No messages, no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a success toast with this message when the run succeeds.
    /// Without it, success is silent.
    #[must_use]
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    /// Replace the failure toast's text. Without it, the error's own
    /// user-facing message is shown.
    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Invoke after a successful run, before the value is returned.
    #[must_use]
    pub fn on_success(mut self, callback: impl Fn(&R) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Invoke after a failed run, before the error is returned.
    #[must_use]
    pub fn on_error(mut self, callback: impl Fn(&AppError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}

/// A mutation runner with observable `{loading, error}` state.
pub struct Action {
    state: Mutable<ActionState>,
    notifications: Arc<Notifications>,
    session: Option<Arc<Session>>,
}

impl Action {
    /// An action that only reports to the given toast queue.
    #[must_use]
    pub fn new(notifications: Arc<Notifications>) -> Self {
        Self {
            state: Mutable::new(ActionState::default()),
            notifications,
            session: None,
        }
    }

    /// An action that additionally invalidates the session when a run
    /// fails with an expired or missing token.
    #[must_use]
    pub fn with_session(notifications: Arc<Notifications>, session: Arc<Session>) -> Self {
        Self {
            state: Mutable::new(ActionState::default()),
            notifications,
            session: Some(session),
        }
    }

    /// Run one mutation to completion.
    ///
    /// On success: queues the configured success toast (if any), invokes
    /// `on_success`, returns the value. On failure: stores the error,
    /// queues a failure toast, invokes `on_error`, and returns the error to
    /// the caller. A failure that invalidates the session skips the toast;
    /// the redirect to the login view is the visible outcome there.
    pub async fn run<R, Fut>(&self, operation: Fut, options: ActionOptions<R>) -> Result<R, AppError>
    where
        Fut: Future<Output = Result<R, AppError>>,
    {
        {
            let mut state = self.state.lock_mut();
            state.loading = true;
            state.error = None;
        }

        match operation.await {
            Ok(value) => {
                self.state.lock_mut().loading = false;
                if let Some(message) = &options.success_message {
                    self.notifications.success(message.clone());
                }
                if let Some(callback) = &options.on_success {
                    callback(&value);
                }
                Ok(value)
            }
            Err(error) => {
                tracing::debug!(code = error.code(), "action failed");
                {
                    let mut state = self.state.lock_mut();
                    state.loading = false;
                    state.error = Some(error.clone());
                }
                if error.is_unauthenticated() {
                    if let Some(session) = &self.session {
                        session.invalidate().await;
                    }
                } else {
                    match &options.error_message {
                        Some(message) => {
                            self.notifications.error(message.clone());
                        }
                        None => {
                            self.notifications.notify_app_error(&error);
                        }
                    }
                }
                if let Some(callback) = &options.on_error {
                    callback(&error);
                }
                Err(error)
            }
        }
    }

    /// Current state, cloned out of the cell.
    #[must_use]
    pub fn snapshot(&self) -> ActionState {
        self.state.get_cloned()
    }

    /// Reactive view of the state.
    pub fn signal(&self) -> impl Signal<Item = ActionState> {
        self.state.signal_cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AuthFailure;
    use crate::notifications::ToastLevel;
    use parking_lot::Mutex;

    fn make_action() -> (Action, Arc<Notifications>) {
        let notifications = Arc::new(Notifications::new());
        (Action::new(notifications.clone()), notifications)
    }

    #[tokio::test]
    async fn test_success_returns_value_and_toasts_when_asked() {
        let (action, notifications) = make_action();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        let result = action
            .run(
                async { Ok(41 + 1) },
                ActionOptions::new()
                    .with_success_message("party created")
                    .on_success(move |value: &i32| *sink.lock() = Some(*value)),
            )
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(*seen.lock(), Some(42));

        let toasts = notifications.snapshot();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Success);
        assert_eq!(toasts[0].message, "party created");

        let state = action.snapshot();
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_success_is_silent_without_a_message() {
        let (action, notifications) = make_action();
        let result: Result<(), AppError> =
            action.run(async { Ok(()) }, ActionOptions::new()).await;
        assert!(result.is_ok());
        assert!(notifications.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_failure_notifies_stores_and_returns_the_error() {
        let (action, notifications) = make_action();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        let result: Result<(), AppError> = action
            .run(
                async { Err(AppError::api(400, "이미 참여 중인 공대입니다")) },
                ActionOptions::new().on_error(move |error: &AppError| {
                    *sink.lock() = Some(error.code());
                }),
            )
            .await;

        // The failure reaches the caller even though it was also toasted.
        assert!(result.is_err());
        assert_eq!(*seen.lock(), Some("API_CLIENT"));

        let toasts = notifications.snapshot();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, "이미 참여 중인 공대입니다");

        let state = action.snapshot();
        assert!(!state.loading);
        assert!(matches!(state.error, Some(AppError::Api { status: 400, .. })));
    }

    #[tokio::test]
    async fn test_error_message_override_wins() {
        let (action, notifications) = make_action();
        let result: Result<(), AppError> = action
            .run(
                async { Err(AppError::api(500, "stack trace soup")) },
                ActionOptions::new().with_error_message("could not join the party"),
            )
            .await;
        assert!(result.is_err());

        let toasts = notifications.snapshot();
        assert_eq!(toasts[0].message, "could not join the party");
        assert_eq!(toasts[0].level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn test_loading_is_true_while_the_operation_runs() {
        let notifications = Arc::new(Notifications::new());
        let action = Arc::new(Action::new(notifications));
        let probe = action.clone();

        let result = action
            .run(
                async move {
                    assert!(probe.snapshot().loading);
                    Ok(())
                },
                ActionOptions::new(),
            )
            .await;

        assert!(result.is_ok());
        assert!(!action.snapshot().loading);
    }

    #[tokio::test]
    async fn test_next_run_clears_previous_error() {
        let (action, _notifications) = make_action();
        let failed: Result<(), AppError> = action
            .run(
                async { Err(AppError::api(409, "week already recorded")) },
                ActionOptions::new(),
            )
            .await;
        assert!(failed.is_err());
        assert!(action.snapshot().error.is_some());

        let ok: Result<(), AppError> = action.run(async { Ok(()) }, ActionOptions::new()).await;
        assert!(ok.is_ok());
        assert!(action.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_overlapping_runs_are_not_prevented() {
        let notifications = Arc::new(Notifications::new());
        let action = Arc::new(Action::new(notifications.clone()));

        let first = action.run(
            async {
                tokio::task::yield_now().await;
                Ok("first")
            },
            ActionOptions::new().with_success_message("first done"),
        );
        let second = action.run(
            async { Ok("second") },
            ActionOptions::new().with_success_message("second done"),
        );

        let (first, second) = futures::join!(first, second);
        assert_eq!(first.unwrap(), "first");
        assert_eq!(second.unwrap(), "second");
        assert_eq!(notifications.snapshot().len(), 2);
        assert!(!action.snapshot().loading);
    }

    #[tokio::test]
    async fn test_session_expiry_skips_the_toast() {
        let (action, notifications) = make_action();
        let result: Result<(), AppError> = action
            .run(
                async {
                    Err(AppError::auth(AuthFailure::TokenExpired, "POST /parties"))
                },
                ActionOptions::new(),
            )
            .await;

        assert!(result.is_err());
        // No toast: the session reset and redirect are the visible outcome.
        assert!(notifications.snapshot().is_empty());
        assert!(action.snapshot().error.is_some());
    }
}
