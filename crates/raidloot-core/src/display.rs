//! # Display Catalog
//!
//! Bilingual labels and fixed game constants that every frontend renders
//! the same way. Record names (`name_kr` / `name_en`) come from the
//! backend; labels for *enums* live here because the wire only carries
//! their identifier strings.

use crate::model::{DistributionMethod, GearSetKind, GearSlot, ItemKind};
use crate::roster::Role;

/// Korean and English display strings for a wire enum.
pub trait Label {
    /// Korean label.
    fn label_kr(&self) -> &'static str;
    /// English label.
    fn label_en(&self) -> &'static str;
}

impl Label for Role {
    fn label_kr(&self) -> &'static str {
        match self {
            Self::Tank => "탱커",
            Self::Healer => "힐러",
            Self::MeleeDps => "근거리 딜러",
            Self::RangedDps => "원거리 딜러",
            Self::MagicDps => "마법 딜러",
            Self::Unknown => "알 수 없음",
        }
    }

    fn label_en(&self) -> &'static str {
        match self {
            Self::Tank => "Tank",
            Self::Healer => "Healer",
            Self::MeleeDps => "Melee DPS",
            Self::RangedDps => "Ranged DPS",
            Self::MagicDps => "Magic DPS",
            Self::Unknown => "Unknown",
        }
    }
}

impl Label for GearSlot {
    fn label_kr(&self) -> &'static str {
        match self {
            Self::Weapon => "무기",
            Self::Head => "머리",
            Self::Body => "상의",
            Self::Hands => "장갑",
            Self::Legs => "하의",
            Self::Feet => "신발",
            Self::Earrings => "귀걸이",
            Self::Necklace => "목걸이",
            Self::Bracelet => "팔찌",
            Self::Ring => "반지",
        }
    }

    fn label_en(&self) -> &'static str {
        match self {
            Self::Weapon => "Weapon",
            Self::Head => "Head",
            Self::Body => "Body",
            Self::Hands => "Hands",
            Self::Legs => "Legs",
            Self::Feet => "Feet",
            Self::Earrings => "Earrings",
            Self::Necklace => "Necklace",
            Self::Bracelet => "Bracelet",
            Self::Ring => "Ring",
        }
    }
}

impl Label for ItemKind {
    fn label_kr(&self) -> &'static str {
        match self {
            Self::NormalRaid => "일반 레이드",
            Self::SavageRaid => "영웅 레이드",
            Self::Tome => "석판",
            Self::AugmentedTome => "보강 석판",
            Self::Crafted => "제작",
            Self::Extreme => "극만신",
        }
    }

    fn label_en(&self) -> &'static str {
        match self {
            Self::NormalRaid => "Normal Raid",
            Self::SavageRaid => "Savage Raid",
            Self::Tome => "Tome",
            Self::AugmentedTome => "Augmented Tome",
            Self::Crafted => "Crafted",
            Self::Extreme => "Extreme",
        }
    }
}

impl Label for DistributionMethod {
    fn label_kr(&self) -> &'static str {
        match self {
            Self::Priority => "우선순위",
            Self::NeedGreed => "먹고빠지기",
        }
    }

    fn label_en(&self) -> &'static str {
        match self {
            Self::Priority => "Priority",
            Self::NeedGreed => "Need/Greed",
        }
    }
}

impl Label for GearSetKind {
    fn label_kr(&self) -> &'static str {
        match self {
            Self::Current => "현재",
            Self::Start => "시작",
            Self::Final => "최종",
        }
    }

    fn label_en(&self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Start => "Start",
            Self::Final => "Final",
        }
    }
}

/// Capped-tomestone price of a tome item for the given slot.
///
/// Fixed by the game per slot, not per item: weapons 500, left-side pieces
/// 495 or 825, accessories 375.
#[must_use]
pub fn tome_cost(slot: GearSlot) -> u32 {
    match slot {
        GearSlot::Weapon => 500,
        GearSlot::Head | GearSlot::Hands | GearSlot::Feet => 495,
        GearSlot::Body | GearSlot::Legs => 825,
        GearSlot::Earrings | GearSlot::Necklace | GearSlot::Bracelet | GearSlot::Ring => 375,
    }
}
