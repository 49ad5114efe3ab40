//! # Session Gate
//!
//! Process-wide identity state and route gating. One [`Session`] exists per
//! running client; every protected view consults it and every backend call
//! that discovers an invalid token reports back to it.
//!
//! ## Lifecycle
//!
//! ```text
//!                ┌──────────────┐
//!        startup │ INITIALIZING │
//!                └──────┬───────┘
//!            resolve()  │
//!          ┌────────────┴─────────────┐
//!          ▼                          ▼
//!   ┌───────────────┐  login   ┌───────────┐
//!   │ AUTHENTICATED │ ◄─────── │ ANONYMOUS │
//!   └───────┬───────┘          └───────────┘
//!           │  logout / invalidate     ▲
//!           └──────────────────────────┘
//! ```
//!
//! `resolve` runs once at startup: stored credentials are exchanged for the
//! account they belong to, and credentials the backend no longer accepts
//! are discarded on the spot. `invalidate` is the downstream half of the
//! same rule: any request that fails with an expired or missing token
//! forces the session back to anonymous, exactly as a logout would.

use futures_signals::signal::{Mutable, Signal};
use tokio::sync::broadcast;

use raidloot_core::User;

use crate::errors::AppError;
use crate::server_bridge::BoxedServerBridge;

/// Capacity of the session event channel. Events are transient redirect
/// triggers; a slow shell losing old ones is harmless.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup resolution has not finished; identity unknown.
    Initializing,
    /// A user is logged in.
    Authenticated,
    /// Nobody is logged in.
    Anonymous,
}

/// Observable session state. `user` is `Some` exactly in the
/// [`SessionPhase::Authenticated`] phase.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Current phase.
    pub phase: SessionPhase,
    /// The logged-in account, if any.
    pub user: Option<User>,
}

/// Broadcast notifications for shells that react to identity changes
/// (navigation, cache clearing).
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A user logged in, or a stored session was restored at startup.
    SignedIn(User),
    /// The user logged out deliberately.
    SignedOut,
    /// The backend rejected the stored credentials; the shell should
    /// return to the login view.
    Invalidated,
}

/// What a protected route should do right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Startup resolution still running; show a neutral placeholder.
    Pending,
    /// Render the protected content.
    Grant,
    /// Not logged in; go to the login view, remembering where the user
    /// wanted to go.
    RedirectToLogin {
        /// Original destination to return to after login.
        return_to: Option<String>,
    },
    /// Logged in but not an admin where one is required; go to the
    /// default landing view.
    RedirectHome,
}

/// Process-wide identity holder and route gate.
pub struct Session {
    state: Mutable<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    bridge: BoxedServerBridge,
}

impl Session {
    /// Create a session in the initializing phase. Call
    /// [`Session::resolve`] once a runtime is available.
    #[must_use]
    pub fn new(bridge: BoxedServerBridge) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutable::new(SessionState {
                phase: SessionPhase::Initializing,
                user: None,
            }),
            events,
            bridge,
        }
    }

    /// Resolve identity from stored credentials, once, at startup.
    ///
    /// No credentials means anonymous. Credentials the backend rejects are
    /// discarded and the session settles anonymous; the rejection is not
    /// surfaced as an error since an expired token on startup is an
    /// ordinary condition.
    pub async fn resolve(&self) {
        if !self.bridge.has_credentials().await {
            self.settle_anonymous();
            return;
        }
        match self.bridge.current_user().await {
            Ok(user) => {
                tracing::debug!(username = %user.username, "restored stored session");
                self.settle_authenticated(user);
            }
            Err(error) => {
                tracing::debug!(%error, "stored credentials rejected, discarding");
                self.discard_credentials().await;
                self.settle_anonymous();
            }
        }
    }

    /// Exchange credentials for an authenticated session.
    ///
    /// The bridge stores the token on success; the follow-up identity fetch
    /// confirms it works. If that fetch fails the token is discarded again
    /// so a half-open session can never persist, and the failure propagates
    /// to the caller (typically an [`crate::action::Action`] driving the
    /// login form).
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AppError> {
        self.bridge.login(username, password).await?;
        match self.bridge.current_user().await {
            Ok(user) => {
                self.settle_authenticated(user.clone());
                Ok(user)
            }
            Err(error) => {
                tracing::warn!(%error, "identity fetch after login failed");
                self.discard_credentials().await;
                self.settle_anonymous();
                Err(error)
            }
        }
    }

    /// Discard credentials and return to anonymous, unconditionally.
    pub async fn logout(&self) {
        self.discard_credentials().await;
        let was_signed_in = self.settle_anonymous();
        if was_signed_in {
            let _ = self.events.send(SessionEvent::SignedOut);
        }
    }

    /// React to a downstream request that found the stored credentials
    /// invalid: same transition as a logout, but announced as an
    /// invalidation so shells redirect to the login view.
    ///
    /// Idempotent: concurrent failing requests produce one event.
    pub async fn invalidate(&self) {
        self.discard_credentials().await;
        let was_signed_in = self.settle_anonymous();
        if was_signed_in {
            tracing::info!("session invalidated by backend");
            let _ = self.events.send(SessionEvent::Invalidated);
        }
    }

    /// Decide what a protected route should do right now.
    ///
    /// `return_to` is the destination the user was headed for; it rides
    /// along on the login redirect so the shell can come back afterwards.
    #[must_use]
    pub fn guard(&self, return_to: Option<&str>, require_admin: bool) -> GuardDecision {
        let state = self.state.get_cloned();
        match state.phase {
            SessionPhase::Initializing => GuardDecision::Pending,
            SessionPhase::Anonymous => GuardDecision::RedirectToLogin {
                return_to: return_to.map(str::to_owned),
            },
            SessionPhase::Authenticated => {
                let is_admin = state.user.as_ref().is_some_and(|user| user.is_admin);
                if require_admin && !is_admin {
                    GuardDecision::RedirectHome
                } else {
                    GuardDecision::Grant
                }
            }
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.lock_ref().phase
    }

    /// The logged-in account, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.lock_ref().user.clone()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }

    /// Whether the logged-in user is an admin. Anonymous is never admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state
            .lock_ref()
            .user
            .as_ref()
            .is_some_and(|user| user.is_admin)
    }

    /// Reactive view of the session state.
    pub fn signal(&self) -> impl Signal<Item = SessionState> {
        self.state.signal_cloned()
    }

    /// Subscribe to identity-change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn settle_authenticated(&self, user: User) {
        {
            let mut state = self.state.lock_mut();
            state.phase = SessionPhase::Authenticated;
            state.user = Some(user.clone());
        }
        // State first, then the event, so handlers observe the new phase.
        let _ = self.events.send(SessionEvent::SignedIn(user));
    }

    /// Returns whether a user was signed in before settling.
    fn settle_anonymous(&self) -> bool {
        let mut state = self.state.lock_mut();
        let was_signed_in = state.phase == SessionPhase::Authenticated;
        state.phase = SessionPhase::Anonymous;
        state.user = None;
        was_signed_in
    }

    async fn discard_credentials(&self) {
        if let Err(error) = self.bridge.discard_credentials().await {
            tracing::warn!(%error, "failed to discard stored credentials");
        }
    }
}
