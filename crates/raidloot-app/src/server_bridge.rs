//! # ServerBridge: Abstract Backend Operations
//!
//! This module defines the `ServerBridge` trait, which abstracts every call
//! the application core makes against the loot-tracker backend. This keeps
//! `raidloot-app` a pure application core with no HTTP client, TLS stack, or
//! token storage of its own.
//!
//! ## Design
//!
//! ```text
//! raidloot-app (pure)       raidloot-client (runtime)
//! ┌─────────────────┐       ┌──────────────────┐
//! │ AppCore         │       │ HttpServerBridge │
//! │   ┌────────────┐│       │   implements     │
//! │   │ServerBridge││◄──────│   ServerBridge   │
//! │   └────────────┘│       │                  │
//! └─────────────────┘       └──────────────────┘
//! ```
//!
//! Credentials are owned by the bridge: `login` stores whatever proof the
//! backend hands back, every later call attaches it, and
//! `discard_credentials` forgets it. The core only ever asks *whether*
//! credentials exist, never what they are.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use raidloot_core::{
    AvailableJobs, Distribution, DistributionId, DistributionMethod, EquipmentChoice,
    EquipmentSet, GearSetKind, GearSlot, Item, ItemId, ItemKind, Job, JobId,
    MemberCurrencyRequirements, Party, PartyId, PartyMember, PartyMemberId, PriorityBoard, Raid,
    RaidId, RaidSchedule, Role, ScheduleId, User, UserCharacter, UserId,
};

use crate::errors::{AppError, NetworkErrorCode};

// =========================================================================
// Filter shapes
// =========================================================================

/// Page window for admin listings. The backend caps `limit` at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Records to skip before the first returned one.
    pub skip: u32,
    /// Maximum records to return.
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

/// Filters for the party list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartyFilter {
    /// Keep only active (`Some(true)`) or only disbanded (`Some(false)`)
    /// parties.
    pub active: Option<bool>,
    /// Keep only parties the logged-in user belongs to.
    pub mine_only: bool,
}

/// Filters for item catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFilter {
    /// Keep only items for one gear slot.
    pub slot: Option<GearSlot>,
    /// Keep only items of one acquisition kind.
    pub kind: Option<ItemKind>,
}

/// Filters for the distribution history of a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DistributionFilter {
    /// Keep only hand-outs recorded for one raid week.
    pub week_number: Option<u32>,
    /// Keep only hand-outs to one member.
    pub member: Option<PartyMemberId>,
}

/// Abstract backend operations required by the application core.
#[async_trait]
pub trait ServerBridge: Send + Sync {
    // =========================================================================
    // Credentials & Accounts
    // =========================================================================

    /// Exchange a username and password for stored credentials.
    ///
    /// On success the bridge holds the session proof internally; callers
    /// follow up with [`ServerBridge::current_user`] to learn who logged in.
    async fn login(&self, username: &str, password: &str) -> Result<(), AppError>;

    /// Create a new account. Does not log in.
    async fn register(&self, username: &str, email: &str, password: &str)
        -> Result<User, AppError>;

    /// Fetch the account the stored credentials belong to.
    async fn current_user(&self) -> Result<User, AppError>;

    /// Change the password of the logged-in account.
    async fn change_password(&self, current: &str, new: &str) -> Result<(), AppError>;

    /// Whether the bridge currently holds credentials (valid or not).
    async fn has_credentials(&self) -> bool;

    /// Forget stored credentials. Idempotent.
    async fn discard_credentials(&self) -> Result<(), AppError>;

    /// Page through every registered account. Admin only.
    async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, AppError>;

    /// Parties one account belongs to. Own account for everyone, any
    /// account for admins.
    async fn user_parties(
        &self,
        user: UserId,
        active: Option<bool>,
    ) -> Result<Vec<Party>, AppError>;

    // =========================================================================
    // Game Data
    // =========================================================================

    /// All raid tiers, newest first.
    async fn list_raids(&self) -> Result<Vec<Raid>, AppError>;

    /// The live raid tier new parties default to.
    async fn current_raid(&self) -> Result<Raid, AppError>;

    /// Create a raid tier. Admin only.
    async fn create_raid(&self, name: &str, patch_number: &str) -> Result<Raid, AppError>;

    /// Playable jobs, optionally narrowed to one role.
    async fn list_jobs(&self, role: Option<Role>) -> Result<Vec<Job>, AppError>;

    /// Items of one raid tier.
    async fn raid_items(&self, raid: RaidId, filter: ItemFilter) -> Result<Vec<Item>, AppError>;

    /// The whole item catalog, optionally narrowed by raid tier and
    /// filter. The admin dashboard browses through this.
    async fn list_items(
        &self,
        raid: Option<RaidId>,
        filter: ItemFilter,
    ) -> Result<Vec<Item>, AppError>;

    // =========================================================================
    // Parties & Membership
    // =========================================================================

    /// All parties visible to the logged-in user, per filter.
    async fn list_parties(&self, filter: PartyFilter) -> Result<Vec<Party>, AppError>;

    /// One party by id.
    async fn get_party(&self, party: PartyId) -> Result<Party, AppError>;

    /// Create a party; the caller becomes its leader.
    async fn create_party(
        &self,
        name: &str,
        raid: RaidId,
        method: DistributionMethod,
    ) -> Result<Party, AppError>;

    /// All members of a party, inactive ones included.
    async fn list_party_members(&self, party: PartyId) -> Result<Vec<PartyMember>, AppError>;

    /// Jobs whose role bucket still has a seat, plus the current
    /// composition.
    async fn available_jobs(&self, party: PartyId) -> Result<AvailableJobs, AppError>;

    /// Join a party with a job and character name. The backend answers
    /// with the new membership id; callers refetch the member list.
    async fn join_party(
        &self,
        party: PartyId,
        job: JobId,
        character_name: &str,
    ) -> Result<PartyMemberId, AppError>;

    /// Leave a party; the membership row is kept but deactivated.
    async fn leave_party(&self, party: PartyId) -> Result<(), AppError>;

    /// The logged-in user's characters across all parties.
    async fn my_characters(&self) -> Result<Vec<UserCharacter>, AppError>;

    /// Characters of one account. Own account for everyone, any account
    /// for admins.
    async fn user_characters(&self, user: UserId) -> Result<Vec<UserCharacter>, AppError>;

    // =========================================================================
    // Gear Sets & Currency
    // =========================================================================

    /// One tracked gear set of one member. Members are addressed by party
    /// and account, matching how the backend scopes gear.
    async fn equipment_set(
        &self,
        party: PartyId,
        user: UserId,
        kind: GearSetKind,
    ) -> Result<EquipmentSet, AppError>;

    /// Replace the slot assignments of one gear set. The backend answers
    /// with a bare confirmation; callers refetch to see the result.
    async fn update_equipment_set(
        &self,
        party: PartyId,
        user: UserId,
        kind: GearSetKind,
        choices: &[EquipmentChoice],
    ) -> Result<(), AppError>;

    /// One member's upgrade costs across the three set spans.
    async fn currency_requirements(
        &self,
        party: PartyId,
        user: UserId,
    ) -> Result<MemberCurrencyRequirements, AppError>;

    // =========================================================================
    // Loot Distribution
    // =========================================================================

    /// The backend's computed priority ranking for a party.
    async fn priority_board(&self, party: PartyId) -> Result<PriorityBoard, AppError>;

    /// Recorded hand-outs of a party, newest first, per filter.
    async fn list_distributions(
        &self,
        party: PartyId,
        filter: DistributionFilter,
    ) -> Result<Vec<Distribution>, AppError>;

    /// Record one hand-out. As a side effect the backend moves the item
    /// into the member's current gear set.
    async fn record_distribution(
        &self,
        party: PartyId,
        member: PartyMemberId,
        item: ItemId,
        week_number: u32,
        notes: Option<&str>,
    ) -> Result<DistributionId, AppError>;

    /// Delete a mis-recorded hand-out.
    async fn delete_distribution(
        &self,
        party: PartyId,
        distribution: DistributionId,
    ) -> Result<(), AppError>;

    // =========================================================================
    // Schedules
    // =========================================================================

    /// Upcoming and past sessions of a party.
    async fn list_schedules(&self, party: PartyId) -> Result<Vec<RaidSchedule>, AppError>;

    /// Schedule a session.
    async fn create_schedule(
        &self,
        party: PartyId,
        scheduled_date: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<ScheduleId, AppError>;

    /// Cancel a session.
    async fn delete_schedule(&self, party: PartyId, schedule: ScheduleId)
        -> Result<(), AppError>;
}

/// Type alias for boxed server bridge
pub type BoxedServerBridge = Arc<dyn ServerBridge>;

/// A no-op server bridge for offline/demo mode
///
/// Every backend operation fails with an offline error; credential queries
/// report none stored. Useful for shells that want to render without a
/// backend, and for tests of startup behavior.
#[derive(Debug, Clone, Default)]
pub struct OfflineServerBridge;

impl OfflineServerBridge {
    /// Create a new offline server bridge
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn offline(what: &str) -> AppError {
        AppError::network_fatal(
            NetworkErrorCode::Offline,
            format!("{what} not available in offline mode"),
        )
    }
}

#[async_trait]
impl ServerBridge for OfflineServerBridge {
    async fn login(&self, _username: &str, _password: &str) -> Result<(), AppError> {
        Err(Self::offline("Login"))
    }

    async fn register(
        &self,
        _username: &str,
        _email: &str,
        _password: &str,
    ) -> Result<User, AppError> {
        Err(Self::offline("Registration"))
    }

    async fn current_user(&self) -> Result<User, AppError> {
        Err(Self::offline("Account lookup"))
    }

    async fn change_password(&self, _current: &str, _new: &str) -> Result<(), AppError> {
        Err(Self::offline("Password change"))
    }

    async fn has_credentials(&self) -> bool {
        false
    }

    async fn discard_credentials(&self) -> Result<(), AppError> {
        // Nothing stored, nothing to forget
        Ok(())
    }

    async fn list_users(&self, _page: PageRequest) -> Result<Vec<User>, AppError> {
        Err(Self::offline("User administration"))
    }

    async fn user_parties(
        &self,
        _user: UserId,
        _active: Option<bool>,
    ) -> Result<Vec<Party>, AppError> {
        Err(Self::offline("Party lookup"))
    }

    async fn list_raids(&self) -> Result<Vec<Raid>, AppError> {
        Err(Self::offline("Raid list"))
    }

    async fn current_raid(&self) -> Result<Raid, AppError> {
        Err(Self::offline("Raid lookup"))
    }

    async fn create_raid(&self, _name: &str, _patch_number: &str) -> Result<Raid, AppError> {
        Err(Self::offline("Raid administration"))
    }

    async fn list_jobs(&self, _role: Option<Role>) -> Result<Vec<Job>, AppError> {
        Err(Self::offline("Job list"))
    }

    async fn raid_items(&self, _raid: RaidId, _filter: ItemFilter) -> Result<Vec<Item>, AppError> {
        Err(Self::offline("Item list"))
    }

    async fn list_items(
        &self,
        _raid: Option<RaidId>,
        _filter: ItemFilter,
    ) -> Result<Vec<Item>, AppError> {
        Err(Self::offline("Item catalog"))
    }

    async fn list_parties(&self, _filter: PartyFilter) -> Result<Vec<Party>, AppError> {
        Err(Self::offline("Party list"))
    }

    async fn get_party(&self, _party: PartyId) -> Result<Party, AppError> {
        Err(Self::offline("Party lookup"))
    }

    async fn create_party(
        &self,
        _name: &str,
        _raid: RaidId,
        _method: DistributionMethod,
    ) -> Result<Party, AppError> {
        Err(Self::offline("Party creation"))
    }

    async fn list_party_members(&self, _party: PartyId) -> Result<Vec<PartyMember>, AppError> {
        Err(Self::offline("Member list"))
    }

    async fn available_jobs(&self, _party: PartyId) -> Result<AvailableJobs, AppError> {
        Err(Self::offline("Job availability"))
    }

    async fn join_party(
        &self,
        _party: PartyId,
        _job: JobId,
        _character_name: &str,
    ) -> Result<PartyMemberId, AppError> {
        Err(Self::offline("Joining"))
    }

    async fn leave_party(&self, _party: PartyId) -> Result<(), AppError> {
        Err(Self::offline("Leaving"))
    }

    async fn my_characters(&self) -> Result<Vec<UserCharacter>, AppError> {
        Err(Self::offline("Character list"))
    }

    async fn user_characters(&self, _user: UserId) -> Result<Vec<UserCharacter>, AppError> {
        Err(Self::offline("Character list"))
    }

    async fn equipment_set(
        &self,
        _party: PartyId,
        _user: UserId,
        _kind: GearSetKind,
    ) -> Result<EquipmentSet, AppError> {
        Err(Self::offline("Gear sets"))
    }

    async fn update_equipment_set(
        &self,
        _party: PartyId,
        _user: UserId,
        _kind: GearSetKind,
        _choices: &[EquipmentChoice],
    ) -> Result<(), AppError> {
        Err(Self::offline("Gear set update"))
    }

    async fn currency_requirements(
        &self,
        _party: PartyId,
        _user: UserId,
    ) -> Result<MemberCurrencyRequirements, AppError> {
        Err(Self::offline("Currency planning"))
    }

    async fn priority_board(&self, _party: PartyId) -> Result<PriorityBoard, AppError> {
        Err(Self::offline("Priority calculation"))
    }

    async fn list_distributions(
        &self,
        _party: PartyId,
        _filter: DistributionFilter,
    ) -> Result<Vec<Distribution>, AppError> {
        Err(Self::offline("Distribution history"))
    }

    async fn record_distribution(
        &self,
        _party: PartyId,
        _member: PartyMemberId,
        _item: ItemId,
        _week_number: u32,
        _notes: Option<&str>,
    ) -> Result<DistributionId, AppError> {
        Err(Self::offline("Distribution recording"))
    }

    async fn delete_distribution(
        &self,
        _party: PartyId,
        _distribution: DistributionId,
    ) -> Result<(), AppError> {
        Err(Self::offline("Distribution deletion"))
    }

    async fn list_schedules(&self, _party: PartyId) -> Result<Vec<RaidSchedule>, AppError> {
        Err(Self::offline("Schedule list"))
    }

    async fn create_schedule(
        &self,
        _party: PartyId,
        _scheduled_date: DateTime<Utc>,
        _notes: Option<&str>,
    ) -> Result<ScheduleId, AppError> {
        Err(Self::offline("Scheduling"))
    }

    async fn delete_schedule(
        &self,
        _party: PartyId,
        _schedule: ScheduleId,
    ) -> Result<(), AppError> {
        Err(Self::offline("Schedule deletion"))
    }
}
