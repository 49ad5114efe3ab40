//! # Wire Records
//!
//! Mirrors of the backend's JSON contract, one struct per response record.
//! Field names match the wire exactly so every type round-trips through
//! `serde_json` without rename tables; enums carry their backend strings via
//! `rename_all`. Bilingual names keep both the Korean display string and the
//! English one, as the backend stores them.
//!
//! These are plain data. Derived facts (composition, shortfalls, priority
//! ordering) live in [`crate::roster`] and the application layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{
    DistributionId, ItemId, JobId, PartyId, PartyMemberId, RaidId, ScheduleId, UserId,
};
use crate::roster::{Composition, Role, RosterMember};

// ─── Accounts ────────────────────────────────────────────────

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account key.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Contact address supplied at registration.
    pub email: String,
    /// Disabled accounts cannot log in.
    pub is_active: bool,
    /// Admins manage raids, jobs, and items.
    pub is_admin: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

// ─── Game data ───────────────────────────────────────────────

/// A playable job (class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Job key.
    pub id: JobId,
    /// Korean display name.
    pub name_kr: String,
    /// English display name.
    pub name_en: String,
    /// Combat role, which decides the composition bucket.
    pub role: Role,
    /// Icon asset name, when the backend has one.
    pub icon_name: Option<String>,
}

/// A raid tier parties are formed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raid {
    /// Raid key.
    pub id: RaidId,
    /// Tier name.
    pub name: String,
    /// Game patch the tier shipped with.
    pub patch_number: String,
    /// Whether this is the live tier new parties default to.
    pub is_current: bool,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Equipment slot an item occupies. Wire strings are the lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearSlot {
    /// Main weapon.
    Weapon,
    /// Head piece.
    Head,
    /// Body piece.
    Body,
    /// Hand piece.
    Hands,
    /// Leg piece.
    Legs,
    /// Foot piece.
    Feet,
    /// Earring accessory.
    Earrings,
    /// Necklace accessory.
    Necklace,
    /// Bracelet accessory.
    Bracelet,
    /// Ring accessory.
    Ring,
}

impl GearSlot {
    /// Every slot in canonical display order (weapon first, ring last).
    pub const ALL: [Self; 10] = [
        Self::Weapon,
        Self::Head,
        Self::Body,
        Self::Hands,
        Self::Legs,
        Self::Feet,
        Self::Earrings,
        Self::Necklace,
        Self::Bracelet,
        Self::Ring,
    ];

    /// Wire name, as used in `slot` fields and query filters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Head => "head",
            Self::Body => "body",
            Self::Hands => "hands",
            Self::Legs => "legs",
            Self::Feet => "feet",
            Self::Earrings => "earrings",
            Self::Necklace => "necklace",
            Self::Bracelet => "bracelet",
            Self::Ring => "ring",
        }
    }
}

/// Acquisition source of an item, which drives upgrade planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Drops from the normal difficulty.
    NormalRaid,
    /// Drops from the savage difficulty.
    SavageRaid,
    /// Bought with capped tomestones.
    Tome,
    /// Tome gear upgraded with raid materials.
    AugmentedTome,
    /// Crafted entry gear.
    Crafted,
    /// Extreme trial weapon.
    Extreme,
}

impl ItemKind {
    /// Wire name, as used in `item_type` fields and query filters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NormalRaid => "normal_raid",
            Self::SavageRaid => "savage_raid",
            Self::Tome => "tome",
            Self::AugmentedTome => "augmented_tome",
            Self::Crafted => "crafted",
            Self::Extreme => "extreme",
        }
    }
}

/// A lootable or purchasable piece of gear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item key.
    pub id: ItemId,
    /// Raid tier the item belongs to.
    pub raid_id: RaidId,
    /// Korean display name.
    pub name_kr: String,
    /// English display name.
    pub name_en: String,
    /// Slot the item is worn in.
    pub slot: GearSlot,
    /// Acquisition source.
    #[serde(rename = "item_type")]
    pub kind: ItemKind,
    /// Item level.
    pub item_level: u32,
    /// Icon asset name, when the backend has one.
    pub icon_name: Option<String>,
}

// ─── Parties ─────────────────────────────────────────────────

/// How a party hands out loot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMethod {
    /// Need-ranked priority list computed from gear plans.
    Priority,
    /// Classic need/greed rolls; no tracking beyond the record.
    NeedGreed,
}

/// A static party within a raid tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Party key.
    pub id: PartyId,
    /// Party display name.
    pub name: String,
    /// Raid tier the party runs.
    pub raid_id: RaidId,
    /// Loot distribution policy.
    pub distribution_method: DistributionMethod,
    /// Account of the party leader.
    pub leader_id: UserId,
    /// Disbanded parties stay queryable but reject joins.
    pub is_active: bool,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Embedded raid record; list endpoints include it, some detail
    /// endpoints omit it.
    pub raid: Option<Raid>,
    /// Active member count; only list endpoints compute it.
    pub member_count: Option<usize>,
}

impl Party {
    /// Whether the party is recruiting: active and below 8 members.
    ///
    /// Unknown membership (no `member_count` on this record) counts as
    /// room, matching the backend's join-time check being authoritative.
    #[must_use]
    pub fn is_joinable(&self) -> bool {
        self.is_active && self.member_count.unwrap_or(0) < 8
    }
}

/// One occupied slot: a user playing a named character on a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyMember {
    /// Membership key.
    pub id: PartyMemberId,
    /// Party the slot belongs to.
    pub party_id: PartyId,
    /// Account occupying the slot.
    pub user: User,
    /// Job the slot was claimed with.
    pub job: Job,
    /// In-game character name.
    pub character_name: String,
    /// Members who left are kept for history with this flag cleared.
    pub is_active: bool,
    /// Join time.
    pub joined_at: DateTime<Utc>,
}

impl RosterMember for PartyMember {
    fn role(&self) -> Role {
        self.job.role
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Jobs still open to a joining player, with the roster they would enter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableJobs {
    /// Jobs whose bucket still has a seat.
    pub available_jobs: Vec<Job>,
    /// Current active-member counts per bucket.
    pub current_composition: Composition,
}

/// A membership seen from the owning user's side, across parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCharacter {
    /// Membership key.
    pub party_member_id: PartyMemberId,
    /// In-game character name.
    pub character_name: String,
    /// Name of the party the character sits in.
    pub party_name: String,
    /// Display name of the job.
    pub job_name: String,
    /// Role of the job.
    pub job_role: Role,
    /// Join time.
    pub joined_at: DateTime<Utc>,
}

// ─── Gear sets ───────────────────────────────────────────────

/// Which of a member's three tracked gear sets a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearSetKind {
    /// What the character wears right now.
    Current,
    /// The planned starting set for the tier.
    Start,
    /// The planned fully-upgraded set.
    Final,
}

impl GearSetKind {
    /// The three kinds in progression order.
    pub const ALL: [Self; 3] = [Self::Current, Self::Start, Self::Final];

    /// Wire name, as used in `set_type` fields and query strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Start => "start",
            Self::Final => "final",
        }
    }
}

/// One slot of a gear set, possibly still unplanned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Slot being described.
    pub slot: GearSlot,
    /// Chosen item, or `None` while the slot is unplanned.
    pub item: Option<Item>,
}

/// A member's full 10-slot gear set of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSet {
    /// Owning membership.
    pub party_member_id: PartyMemberId,
    /// Character the set belongs to.
    pub character_name: String,
    /// Which tracked set this is.
    #[serde(rename = "set_type")]
    pub kind: GearSetKind,
    /// All ten slots, planned or not.
    pub equipment: Vec<Equipment>,
    /// Percentage of slots filled, 0–100, computed by the backend.
    pub completion_rate: f64,
}

/// One slot assignment inside a gear-set update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentChoice {
    /// Slot being written.
    pub slot: GearSlot,
    /// Item to plan, or `None` to clear the slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
}

// ─── Currency planning ───────────────────────────────────────

/// Currency and token amounts needed to move between two gear sets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrencyTotals {
    /// Capped tomestones to spend.
    pub tome_stones: u32,
    /// Raid tokens needed, keyed by floor name.
    pub raid_tokens: BTreeMap<String, u32>,
    /// Upgrade materials needed, keyed by material name.
    pub upgrade_materials: BTreeMap<String, u32>,
}

/// The three spans of a member's upgrade path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyLadder {
    /// Current set to planned starting set.
    pub current_to_start: CurrencyTotals,
    /// Starting set to fully-upgraded set.
    pub start_to_final: CurrencyTotals,
    /// Current set all the way to fully-upgraded.
    pub current_to_final: CurrencyTotals,
}

/// A member's upgrade-cost breakdown as the backend computes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCurrencyRequirements {
    /// Owning membership.
    pub party_member_id: PartyMemberId,
    /// Character the costs are for.
    pub character_name: String,
    /// Costs per upgrade span.
    pub currency_requirements: CurrencyLadder,
}

// ─── Distribution & priority ─────────────────────────────────

/// One recorded loot hand-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Record key.
    pub id: DistributionId,
    /// Party the loot dropped in.
    pub party_id: PartyId,
    /// Member who received the item.
    pub party_member: PartyMember,
    /// Item handed out.
    pub item: Item,
    /// Raid week the drop happened in.
    pub week_number: u32,
    /// When the hand-out was recorded.
    pub distributed_at: DateTime<Utc>,
    /// Free-form note from the recorder.
    pub notes: Option<String>,
}

/// One member's row on the computed priority board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityStanding {
    /// Membership being ranked.
    pub party_member_id: PartyMemberId,
    /// Character name for display.
    pub character_name: String,
    /// Job name for display.
    pub job: String,
    /// Total currency the member still needs.
    pub total_currency_needed: u32,
    /// Items already received this tier.
    pub items_received: u32,
    /// Planned items not yet obtained.
    pub needed_items_count: u32,
    /// Rank, 1 = next in line.
    pub priority: u32,
}

/// The backend's full priority calculation for a party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityBoard {
    /// Party the board belongs to.
    pub party_id: PartyId,
    /// Party name for display.
    pub party_name: String,
    /// Human-readable name of the ranking method used.
    pub calculation_method: String,
    /// Rows in rank order.
    pub member_priorities: Vec<PriorityStanding>,
}

// ─── Schedules ───────────────────────────────────────────────

/// A scheduled raid session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidSchedule {
    /// Record key.
    pub id: ScheduleId,
    /// Party the session belongs to.
    pub party_id: PartyId,
    /// When the session starts.
    pub scheduled_date: DateTime<Utc>,
    /// Free-form note.
    pub notes: Option<String>,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
}
