//! # Raidloot Core
//!
//! Pure domain model for the raidloot party tracker: typed identifiers,
//! wire-faithful records, roster composition rules, and the synchronous
//! validation helpers shared by every frontend.
//!
//! Nothing in this crate performs I/O or depends on an async runtime. The
//! application layer (`raidloot-app`) builds its reactive state machines on
//! top of these types; the HTTP layer (`raidloot-client`) serializes them
//! straight onto the backend's JSON contract.
//!
//! ## Composition rules
//!
//! A full party is 8 members: 2 tanks, 2 healers, 4 damage dealers (the
//! three DPS roles share one bucket). [`roster::classify`] derives the
//! current [`roster::Composition`] from active members only, and
//! [`roster::Composition::status`] turns it into a renderable summary.

pub mod display;
pub mod identifiers;
pub mod model;
pub mod roster;
pub mod validation;

pub use display::{tome_cost, Label};
pub use identifiers::{
    DistributionId, ItemId, JobId, PartyId, PartyMemberId, RaidId, ScheduleId, UserId,
};
pub use model::{
    AvailableJobs, CurrencyLadder, CurrencyTotals, Distribution, DistributionMethod, Equipment,
    EquipmentChoice, EquipmentSet, GearSetKind, GearSlot, Item, ItemKind, Job,
    MemberCurrencyRequirements, Party, PartyMember, PriorityBoard, PriorityStanding, Raid,
    RaidSchedule, User, UserCharacter,
};
pub use roster::{
    classify, Composition, CompositionStatus, Role, RoleBucket, RosterMember, Shortfall,
};
