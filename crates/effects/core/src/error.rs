//! Error taxonomy for the passive-effect engine.
//!
//! Three families with different surfacing rules:
//! - [`SelectionError`] is returned synchronously to the caller (selection
//!   UI) and never swallowed.
//! - [`DispatchError`] is caught per effect inside `dispatch`, logged, and
//!   never fatal; the remaining effects for that event still run.
//! - [`StateError`] is recovered by reinitializing the single affected
//!   record to its zero state.

use crate::catalog::EffectId;

/// Errors surfaced while building a loadout or unlocking an effect.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionError {
    #[error("loadout cost {cost} exceeds budget cap {budget_cap}")]
    OverBudget { cost: u32, budget_cap: u32 },

    #[error("loadout has {count} effects, maximum is {max_count}")]
    TooManyEffects { count: usize, max_count: usize },

    #[error("unknown effect id: {0}")]
    UnknownId(EffectId),

    #[error("duplicate effect id: {0}")]
    Duplicate(EffectId),

    #[error("insufficient currency: effect costs {price}, balance is {balance}")]
    InsufficientCurrency { price: u32, balance: u32 },
}

/// Per-effect dispatch failures. Logged by the dispatcher, never returned
/// to the game loop.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("handler for effect {effect} failed: {reason}")]
    HandlerFailed { effect: EffectId, reason: String },

    #[error("handler for effect {effect} produced an invalid delta: {reason}")]
    InvalidDelta { effect: EffectId, reason: String },
}

/// State-store anomalies. All variants are recoverable: the affected
/// record is reset to zero and play continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("no runtime record for active effect {0}; reinitialized to zero")]
    MissingRecord(EffectId),
}

/// Errors raised while assembling an [`crate::catalog::EffectCatalog`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("effect {id} has cost {cost}, allowed range is {min}..={max}")]
    CostOutOfRange {
        id: EffectId,
        cost: u32,
        min: u32,
        max: u32,
    },

    #[error("effect {0} is already registered")]
    DuplicateId(EffectId),
}
