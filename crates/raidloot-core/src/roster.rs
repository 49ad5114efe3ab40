//! # Roster Composition
//!
//! Role bookkeeping for 8-member parties. The fixed target shape is
//! 2 tanks / 2 healers / 4 damage dealers; the three DPS roles share one
//! bucket. Classification looks at **active** members only and ignores any
//! role string it does not recognize; that is a forward-compatibility
//! policy, not an error.
//!
//! ```rust,ignore
//! let composition = classify(&members);
//! match composition.status() {
//!     CompositionStatus::Complete => println!("ready to raid"),
//!     status => println!("{status}"),
//! }
//! ```
//!
//! Everything here is pure and synchronous; the reactive layer feeds it
//! member lists fetched from the backend.

use serde::{Deserialize, Serialize};

// ─── Roles ───────────────────────────────────────────────────

/// Combat role carried by every job.
///
/// Wire strings match the backend enum (`tank`, `healer`, `melee_dps`,
/// `ranged_dps`, `magic_dps`). Unrecognized strings deserialize to
/// [`Role::Unknown`] instead of failing, so a newer backend cannot break
/// older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Main or off tank.
    Tank,
    /// Pure or barrier healer.
    Healer,
    /// Melee damage dealer.
    MeleeDps,
    /// Physical ranged damage dealer.
    RangedDps,
    /// Caster damage dealer.
    MagicDps,
    /// Role string this client does not know; never counted.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// The composition bucket this role counts toward, if any.
    #[must_use]
    pub fn bucket(self) -> Option<RoleBucket> {
        match self {
            Self::Tank => Some(RoleBucket::Tanks),
            Self::Healer => Some(RoleBucket::Healers),
            Self::MeleeDps | Self::RangedDps | Self::MagicDps => Some(RoleBucket::Dps),
            Self::Unknown => None,
        }
    }

    /// Wire name, as used in `role` fields and query filters.
    /// [`Role::Unknown`] has no wire name.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Tank => Some("tank"),
            Self::Healer => Some("healer"),
            Self::MeleeDps => Some("melee_dps"),
            Self::RangedDps => Some("ranged_dps"),
            Self::MagicDps => Some("magic_dps"),
            Self::Unknown => None,
        }
    }
}

/// The three slot buckets a party is balanced over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleBucket {
    /// Tank slots (target 2).
    Tanks,
    /// Healer slots (target 2).
    Healers,
    /// Damage-dealer slots, all three DPS roles combined (target 4).
    Dps,
}

impl RoleBucket {
    /// Number of slots a full party reserves for this bucket.
    #[must_use]
    pub fn target(self) -> usize {
        match self {
            Self::Tanks => 2,
            Self::Healers => 2,
            Self::Dps => 4,
        }
    }

    /// Noun for rendering counts ("tank" / "tanks" / "DPS").
    #[must_use]
    pub fn noun(self, count: usize) -> &'static str {
        match (self, count) {
            (Self::Tanks, 1) => "tank",
            (Self::Tanks, _) => "tanks",
            (Self::Healers, 1) => "healer",
            (Self::Healers, _) => "healers",
            (Self::Dps, _) => "DPS",
        }
    }
}

// ─── Roster input ────────────────────────────────────────────

/// Anything that occupies (or used to occupy) a party slot.
///
/// Classification needs exactly two facts about a member: the role of the
/// job they signed up with, and whether the membership is still active.
pub trait RosterMember {
    /// Role of the job this member occupies a slot with.
    fn role(&self) -> Role;
    /// Whether the membership currently counts toward the roster.
    fn is_active(&self) -> bool;
}

/// Count active members into role buckets.
///
/// Inactive members are excluded entirely; members whose role maps to no
/// bucket ([`Role::Unknown`]) are skipped without error. The result is a
/// plain count: over-full buckets are reported as-is, never clamped.
pub fn classify<'a, M, I>(members: I) -> Composition
where
    M: RosterMember + 'a,
    I: IntoIterator<Item = &'a M>,
{
    let mut composition = Composition::default();
    for member in members {
        if !member.is_active() {
            continue;
        }
        match member.role().bucket() {
            Some(RoleBucket::Tanks) => composition.tanks += 1,
            Some(RoleBucket::Healers) => composition.healers += 1,
            Some(RoleBucket::Dps) => composition.dps += 1,
            None => {}
        }
    }
    composition
}

// ─── Composition ─────────────────────────────────────────────

/// Active-member counts per role bucket.
///
/// Also the wire shape of the backend's `current_composition` field, so the
/// same type serves classification output and API responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// Active tanks.
    pub tanks: usize,
    /// Active healers.
    pub healers: usize,
    /// Active damage dealers (all three DPS roles).
    pub dps: usize,
}

impl Composition {
    /// The fixed shape of a full party: 2 tanks, 2 healers, 4 DPS.
    pub const TARGET: Self = Self {
        tanks: 2,
        healers: 2,
        dps: 4,
    };

    /// Count in a single bucket.
    #[must_use]
    pub fn count(&self, bucket: RoleBucket) -> usize {
        match bucket {
            RoleBucket::Tanks => self.tanks,
            RoleBucket::Healers => self.healers,
            RoleBucket::Dps => self.dps,
        }
    }

    /// Total counted members across all buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.tanks + self.healers + self.dps
    }

    /// Whether every bucket holds exactly its target count.
    ///
    /// Over-full buckets are not complete: the cap is enforced upstream at
    /// join time, and a roster that somehow exceeds it should surface as
    /// off-target rather than done.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        *self == Self::TARGET
    }

    /// Buckets still below target, in fixed tanks → healers → dps order.
    #[must_use]
    pub fn shortfalls(&self) -> Vec<Shortfall> {
        let mut missing = Vec::new();
        for bucket in [RoleBucket::Tanks, RoleBucket::Healers, RoleBucket::Dps] {
            let have = self.count(bucket);
            let want = bucket.target();
            if have < want {
                missing.push(Shortfall {
                    bucket,
                    missing: want - have,
                });
            }
        }
        missing
    }

    /// Summarize this composition for display.
    #[must_use]
    pub fn status(&self) -> CompositionStatus {
        if self.total() == 0 {
            CompositionStatus::Empty
        } else if self.is_complete() {
            CompositionStatus::Complete
        } else {
            CompositionStatus::Incomplete(self.shortfalls())
        }
    }

    /// Whether the bucket for `role` still has an open slot.
    ///
    /// This mirrors the backend's join-time caps (2/2/4, DPS combined), so
    /// frontends can grey out jobs before attempting a doomed join. Roles
    /// outside the known buckets never have a seat.
    #[must_use]
    pub fn has_seat_for(&self, role: Role) -> bool {
        match role.bucket() {
            Some(bucket) => self.count(bucket) < bucket.target(),
            None => false,
        }
    }
}

// ─── Status rendering ────────────────────────────────────────

/// One bucket's distance from its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    /// Bucket below target.
    pub bucket: RoleBucket,
    /// How many more members it needs.
    pub missing: usize,
}

impl std::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} more {}",
            self.missing,
            self.bucket.noun(self.missing)
        )
    }
}

/// Renderable summary of a composition relative to the target shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionStatus {
    /// Nobody counted at all.
    Empty,
    /// Exactly on target.
    Complete,
    /// Off target; lists each bucket below target in fixed order. The list
    /// is empty when every bucket is at or above target but the whole is
    /// not exact (an over-capacity roster).
    Incomplete(Vec<Shortfall>),
}

impl std::fmt::Display for CompositionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "no members"),
            Self::Complete => write!(f, "full party"),
            Self::Incomplete(shortfalls) if shortfalls.is_empty() => {
                write!(f, "over target composition")
            }
            Self::Incomplete(shortfalls) => {
                write!(f, "needs ")?;
                for (i, shortfall) in shortfalls.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{shortfall}")?;
                }
                Ok(())
            }
        }
    }
}
