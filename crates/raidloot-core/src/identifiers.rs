//! Typed identifiers for backend records
//!
//! The backend keys every record with a plain integer. Wrapping each key in
//! its own newtype keeps a `PartyId` from ever being passed where a `UserId`
//! belongs, while `#[serde(transparent)]` keeps the wire format untouched.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Raw integer key as stored by the backend.
            #[must_use]
            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Key of a registered user account.
    UserId
);
define_id!(
    /// Key of a raid tier.
    RaidId
);
define_id!(
    /// Key of a party within a raid tier.
    PartyId
);
define_id!(
    /// Key of a playable job (class).
    JobId
);
define_id!(
    /// Key of a lootable item.
    ItemId
);
define_id!(
    /// Key of a single membership row (user + party + character).
    PartyMemberId
);
define_id!(
    /// Key of one recorded loot hand-out.
    DistributionId
);
define_id!(
    /// Key of a scheduled raid session.
    ScheduleId
);
