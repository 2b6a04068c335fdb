//! Per-effect runtime counters and the closed mutation vocabulary.

use std::collections::BTreeMap;

use crate::party::CharacterId;

/// Runtime counters for one active effect (or one `(effect, character)`
/// pair for per-character bookkeeping).
///
/// Scope rules:
/// - `stacks` persist for the run unless the definition marks them
///   battle-scoped.
/// - `uses_this_floor` / `fired_this_floor` reset on every floor start.
/// - `uses_this_battle` / `fired_this_battle` reset on battle start *and*
///   battle end.
/// - `counters` are free-form run-scoped bookkeeping; handlers clear them
///   explicitly when a shorter lifetime is wanted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectRuntimeState {
    pub stacks: u8,
    pub uses_this_floor: u32,
    pub uses_this_battle: u32,
    pub fired_this_floor: bool,
    pub fired_this_battle: bool,
    pub counters: BTreeMap<String, i64>,
}

impl EffectRuntimeState {
    pub fn counter(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn reset_floor_scope(&mut self) {
        self.uses_this_floor = 0;
        self.fired_this_floor = false;
    }

    pub fn reset_battle_scope(&mut self, battle_scoped_stacks: bool) {
        self.uses_this_battle = 0;
        self.fired_this_battle = false;
        if battle_scoped_stacks {
            self.stacks = 0;
        }
    }
}

/// A single record edit a handler may request.
///
/// Keeping the vocabulary closed makes handler outputs comparable (for
/// determinism tests) and keeps all writes flowing through
/// [`crate::state::EffectStateStore::mutate`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationOp {
    IncrementFloorUses,
    IncrementBattleUses,
    MarkFiredThisFloor,
    MarkFiredThisBattle,
    /// Add stacks, clamped to `max`.
    AddStacks { delta: i8, max: u8 },
    SetCounter { name: String, value: i64 },
    AddCounter { name: String, delta: i64 },
    ClearCounter { name: String },
}

impl MutationOp {
    pub fn apply(&self, record: &mut EffectRuntimeState) {
        match self {
            MutationOp::IncrementFloorUses => record.uses_this_floor += 1,
            MutationOp::IncrementBattleUses => record.uses_this_battle += 1,
            MutationOp::MarkFiredThisFloor => record.fired_this_floor = true,
            MutationOp::MarkFiredThisBattle => record.fired_this_battle = true,
            MutationOp::AddStacks { delta, max } => {
                let stacks = i16::from(record.stacks) + i16::from(*delta);
                record.stacks = stacks.clamp(0, i16::from(*max)) as u8;
            }
            MutationOp::SetCounter { name, value } => {
                record.counters.insert(name.clone(), *value);
            }
            MutationOp::AddCounter { name, delta } => {
                let value = record.counter(name) + delta;
                record.counters.insert(name.clone(), value);
            }
            MutationOp::ClearCounter { name } => {
                record.counters.remove(name);
            }
        }
    }
}

/// A batch of record edits targeting one scope (the effect record, or a
/// per-character sub-record).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateMutation {
    /// `None` targets the effect-level record; `Some` targets the
    /// `(effect, character)` record.
    pub scope: Option<CharacterId>,
    pub ops: Vec<MutationOp>,
}

impl StateMutation {
    pub fn effect_scope(ops: Vec<MutationOp>) -> Self {
        Self { scope: None, ops }
    }

    pub fn character_scope(character: CharacterId, ops: Vec<MutationOp>) -> Self {
        Self {
            scope: Some(character),
            ops,
        }
    }
}
