//! # Raidloot App
//!
//! Headless application layer for the raidloot party tracker. Everything a
//! shell needs short of pixels lives here: the session lifecycle, the
//! dependency-keyed read containers, the mutation wrapper, the toast queue,
//! and the synchronous form workflows. The crate is UI-framework free; a
//! desktop shell, a TUI, and a test harness all drive the same state
//! machines through [`futures_signals`] signals.
//!
//! ## Shape
//!
//! - [`AppCore`] wires a [`ServerBridge`](server_bridge::ServerBridge) to
//!   the process-wide [`Session`](session::Session) and
//!   [`Notifications`](notifications::Notifications), and hands out the
//!   typed read catalog.
//! - [`Resource`](resource::Resource) holds `{data, loading, error}` for
//!   one backend read, keyed by a dependency value. Stale completions are
//!   discarded; failures keep the last good data on screen.
//! - [`Action`](action::Action) runs one mutation with toast and session
//!   policy applied. It deliberately carries no concurrency guard:
//!   [`workflows`] exposes `can_submit_*` so shells disable controls while
//!   an action is in flight.
//! - [`session`] is the `INITIALIZING → AUTHENTICATED | ANONYMOUS` state
//!   machine, including the route guard and the token-rejection path that
//!   signs the user out from anywhere in the app.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod action;
pub mod core;
pub mod errors;
pub mod notifications;
pub mod resource;
pub mod server_bridge;
pub mod session;
pub mod workflows;

pub use action::{Action, ActionOptions, ActionState};
pub use crate::core::AppCore;
pub use errors::{AppError, AuthFailure, NetworkErrorCode};
pub use notifications::{Notifications, Toast, ToastLevel};
pub use resource::{Resource, ResourceState};
pub use server_bridge::{
    BoxedServerBridge, DistributionFilter, ItemFilter, OfflineServerBridge, PageRequest,
    PartyFilter, ServerBridge,
};
pub use session::{GuardDecision, Session, SessionEvent, SessionPhase, SessionState};
