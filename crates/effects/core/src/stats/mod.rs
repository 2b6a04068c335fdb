//! On-demand stat computation.
//!
//! [`resolver::compute`] folds base stats, equipment, temporary boosts,
//! active-effect contributions, and state-conditional rules into an
//! ephemeral [`CharacterStatSnapshot`]. The fold is a pure function of
//! `(character, loadout, store)`: no caching, no mutation, identical
//! output for identical input. Conditional rules are re-evaluated against
//! current HP/MP on every call.

pub mod bonus;
pub mod conditions;
pub mod contributions;
pub mod resolver;
pub mod snapshot;

pub use bonus::{Bonus, BonusStack, StatBounds};
pub use resolver::compute;
pub use snapshot::CharacterStatSnapshot;

/// The stats an effect contribution can target.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Attack,
    Defense,
    Magic,
    Speed,
    Luck,
    CritChance,
    MaxHp,
    MaxMp,
}

impl StatKind {
    /// All kinds, in resolver fold order.
    pub const ALL: [StatKind; 8] = [
        StatKind::Attack,
        StatKind::Defense,
        StatKind::Magic,
        StatKind::Speed,
        StatKind::Luck,
        StatKind::CritChance,
        StatKind::MaxHp,
        StatKind::MaxMp,
    ];

    pub fn bounds(self) -> StatBounds {
        match self {
            StatKind::CritChance => StatBounds::CRIT_CHANCE,
            StatKind::MaxHp | StatKind::MaxMp => StatBounds::RESOURCE_MAX,
            _ => StatBounds::COMBAT,
        }
    }
}
