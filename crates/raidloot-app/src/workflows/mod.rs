//! # Workflows - Portable Form Logic
//!
//! Per-form input types, validation, and submit gating that every frontend
//! shares. Shells bind their widgets to an input struct, re-validate on
//! each keystroke, and enable the submit control with the matching
//! `can_submit_*` helper, which also folds in the action's `loading` flag,
//! since double-submission is prevented here rather than inside
//! [`crate::action::Action`].
//!
//! ## Design Patterns
//!
//! All workflows follow these patterns:
//!
//! - `validate_*(input) -> Result<(), FormError>` with a per-form error
//!   enum naming the first offending field
//! - `is_valid_*(input) -> bool` as the boolean shorthand
//! - `can_submit_*(input, in_flight) -> bool` for submit-control state
//! - Field-level rules (lengths, character repertoires) come from
//!   `raidloot_core::validation`; workflow errors wrap them
//!
//! Everything here is synchronous and pure. The actual submission runs
//! through an [`crate::action::Action`] against the server bridge.

pub mod auth;
pub mod party;
