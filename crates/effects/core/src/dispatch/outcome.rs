//! Dispatch outcomes.
//!
//! Outcomes are plain data: comparable and (with the `serde` feature)
//! serializable, so the determinism contract can be tested as sequence
//! equality. The dispatcher applies resource outcomes to the party before
//! returning them; callers treat the returned list as a log.

use crate::catalog::EffectId;
use crate::party::{CharacterId, StatContribution};

/// One observable result produced by an effect handler.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    pub effect: EffectId,
    pub kind: OutcomeKind,
}

impl Outcome {
    pub fn new(effect: EffectId, kind: OutcomeKind) -> Self {
        Self { effect, kind }
    }
}

/// The payload of an [`Outcome`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutcomeKind {
    /// Restore HP on a party member.
    Heal { character: CharacterId, amount: u32 },
    /// Deal HP damage to a party member (e.g. a cursed effect).
    Damage { character: CharacterId, amount: u32 },
    /// Restore MP on a party member.
    RestoreMp { character: CharacterId, amount: u32 },
    /// Grant a temporary stat boost, cleared at battle end.
    StatBoost {
        character: CharacterId,
        contribution: StatContribution,
    },
    /// User-facing flavor line for the message log.
    Message(String),
}
