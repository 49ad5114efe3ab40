//! Party form workflows
//!
//! Validation and submit gating for party creation, joining, loot
//! recording, and scheduling. The seat-availability side of joining
//! (greying out jobs whose bucket is full) is driven by the
//! `available_jobs` resource and [`raidloot_core::roster::Composition::has_seat_for`];
//! this module only checks the user's own inputs.

use chrono::{DateTime, Utc};
use raidloot_core::validation::{validate_character_name, CharacterNameError};
use raidloot_core::{DistributionMethod, ItemId, JobId, PartyMemberId, RaidId};
use thiserror::Error;

/// Maximum party-name length, matching the creation form's input cap.
pub const MAX_PARTY_NAME_LEN: usize = 30;

// ============================================================================
// Create Party
// ============================================================================

/// Party-creation form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartyInput {
    /// Party display name.
    pub name: String,
    /// Chosen raid tier, if one is selected yet.
    pub raid_id: Option<RaidId>,
    /// Loot policy; the form defaults to priority.
    pub distribution_method: DistributionMethod,
}

impl Default for CreatePartyInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            raid_id: None,
            distribution_method: DistributionMethod::Priority,
        }
    }
}

/// Party-creation validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatePartyError {
    /// Name is empty or whitespace-only
    #[error("Enter a party name")]
    NameEmpty,
    /// Name exceeds [`MAX_PARTY_NAME_LEN`]
    #[error("Party name too long: {length} characters (max {MAX_PARTY_NAME_LEN})")]
    NameTooLong {
        /// Actual length in characters
        length: usize,
    },
    /// No raid tier selected
    #[error("Choose a raid")]
    RaidMissing,
}

/// Validate the party-creation form.
pub fn validate_create_party(input: &CreatePartyInput) -> Result<(), CreatePartyError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CreatePartyError::NameEmpty);
    }
    let length = name.chars().count();
    if length > MAX_PARTY_NAME_LEN {
        return Err(CreatePartyError::NameTooLong { length });
    }
    if input.raid_id.is_none() {
        return Err(CreatePartyError::RaidMissing);
    }
    Ok(())
}

/// Whether the party-creation form's submit control should be enabled.
#[must_use]
pub fn can_submit_create_party(input: &CreatePartyInput, in_flight: bool) -> bool {
    validate_create_party(input).is_ok() && !in_flight
}

// ============================================================================
// Join Party
// ============================================================================

/// Join form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinPartyInput {
    /// Chosen job, if one is selected yet.
    pub job_id: Option<JobId>,
    /// In-game character name.
    pub character_name: String,
}

/// Join form validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinPartyError {
    /// No job selected
    #[error("Choose a job")]
    JobMissing,
    /// Character name failed the field rules
    #[error("{0}")]
    CharacterName(CharacterNameError),
}

/// Validate the join form. The character name is trimmed before the
/// field rules run, matching what gets sent.
pub fn validate_join_party(input: &JoinPartyInput) -> Result<(), JoinPartyError> {
    if input.job_id.is_none() {
        return Err(JoinPartyError::JobMissing);
    }
    validate_character_name(input.character_name.trim())
        .map_err(JoinPartyError::CharacterName)?;
    Ok(())
}

/// Whether the join form's submit control should be enabled.
#[must_use]
pub fn can_submit_join_party(input: &JoinPartyInput, in_flight: bool) -> bool {
    validate_join_party(input).is_ok() && !in_flight
}

// ============================================================================
// Record Distribution
// ============================================================================

/// Loot-recording form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDistributionInput {
    /// Member who received the item, if chosen yet.
    pub party_member_id: Option<PartyMemberId>,
    /// Item handed out, if chosen yet.
    pub item_id: Option<ItemId>,
    /// Raid week of the drop; weeks are numbered from 1.
    pub week_number: u32,
    /// Free-form note; empty means none.
    pub notes: String,
}

/// Loot-recording validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordDistributionError {
    /// No recipient selected
    #[error("Choose who received the item")]
    MemberMissing,
    /// No item selected
    #[error("Choose the item")]
    ItemMissing,
    /// Week number is zero
    #[error("Week numbers start at 1")]
    WeekZero,
}

/// Validate the loot-recording form.
pub fn validate_record_distribution(
    input: &RecordDistributionInput,
) -> Result<(), RecordDistributionError> {
    if input.party_member_id.is_none() {
        return Err(RecordDistributionError::MemberMissing);
    }
    if input.item_id.is_none() {
        return Err(RecordDistributionError::ItemMissing);
    }
    if input.week_number == 0 {
        return Err(RecordDistributionError::WeekZero);
    }
    Ok(())
}

/// Whether the loot-recording form's submit control should be enabled.
#[must_use]
pub fn can_submit_record_distribution(input: &RecordDistributionInput, in_flight: bool) -> bool {
    validate_record_distribution(input).is_ok() && !in_flight
}

// ============================================================================
// Schedule
// ============================================================================

/// Scheduling form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleInput {
    /// Session start, if picked yet.
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Free-form note; empty means none.
    pub notes: String,
}

/// Scheduling validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// No date picked
    #[error("Pick a date and time")]
    DateMissing,
}

/// Validate the scheduling form. Past dates are allowed because parties
/// also backfill sessions that already happened.
pub fn validate_schedule(input: &ScheduleInput) -> Result<(), ScheduleError> {
    if input.scheduled_date.is_none() {
        return Err(ScheduleError::DateMissing);
    }
    Ok(())
}

/// Whether the scheduling form's submit control should be enabled.
#[must_use]
pub fn can_submit_schedule(input: &ScheduleInput, in_flight: bool) -> bool {
    validate_schedule(input).is_ok() && !in_flight
}
