//! Deterministic passive-effect resolution engine.
//!
//! `effects-core` defines the canonical rules for budget-limited passive
//! abilities: the effect catalog and loadout selection, the runtime
//! counter store with run/floor/battle lifecycles, trigger dispatch, and
//! on-demand stat resolution. All state mutation flows through
//! [`state::EffectStateStore::mutate`] during a dispatch or lifecycle
//! reset; everything else is pure and replayable. Hosts feed events in
//! through [`engine::PassiveEngine`] and read outcomes back.
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod event;
pub mod field;
pub mod loadout;
pub mod party;
pub mod state;
pub mod stats;

pub use catalog::{
    BehaviorKind, EffectCatalog, EffectDefinition, EffectId, EffectParams, ParamValue, Rarity,
};
pub use config::EngineConfig;
pub use dispatch::{
    DispatchContext, EffectHandler, HandlerError, HandlerInput, HandlerOutput, HandlerRegistry,
    Outcome, OutcomeKind, PcgRng, RngOracle, TriggerDispatcher,
};
pub use engine::PassiveEngine;
pub use error::{CatalogError, DispatchError, SelectionError, StateError};
pub use event::{BattleOutcome, TriggerEvent, TriggerKind, TriggerSet};
pub use field::StepCounter;
pub use loadout::{
    ActiveLoadout, EconomyOracle, LedgerEconomy, LoadoutEntry, select, unlock,
};
pub use party::{
    BaseStats, CharacterId, CharacterState, Party, ResourceMeter, StatContribution,
};
pub use state::{EffectRuntimeState, EffectStateStore, MutationOp, StateMutation, StateSnapshot};
pub use stats::{Bonus, BonusStack, CharacterStatSnapshot, StatBounds, StatKind};
