//! Stat contributions granted by active effects.
//!
//! These are the always-on (state-scaled) contributions, as opposed to
//! the HP/MP-conditional rules in [`crate::stats::conditions`]. Each
//! behavior reads its own counters from the runtime record and yields
//! zero or more contributions; the resolver folds them in loadout order.

use crate::catalog::{BehaviorKind, EffectDefinition};
use crate::party::StatContribution;
use crate::state::EffectRuntimeState;
use crate::stats::{Bonus, StatKind};

/// Contributions from one active effect given its runtime counters.
///
/// `effect_state` is the effect-level record; `character_state` is the
/// `(effect, character)` record for per-character counters such as combo
/// stacks.
pub fn passive_contributions(
    definition: &EffectDefinition,
    effect_state: &EffectRuntimeState,
    character_state: &EffectRuntimeState,
) -> Vec<StatContribution> {
    match definition.behavior {
        BehaviorKind::ComboMomentum => {
            per_stack_attack(definition, character_state.stacks)
        }
        BehaviorKind::AvengersOath => per_stack_attack(definition, effect_state.stacks),
        _ => Vec::new(),
    }
}

fn per_stack_attack(definition: &EffectDefinition, stacks: u8) -> Vec<StatContribution> {
    if stacks == 0 {
        return Vec::new();
    }
    let per_stack = definition.params.int("attack_inc_pct_per_stack", 0) as i32;
    if per_stack == 0 {
        return Vec::new();
    }
    if definition.multiplicative_stacking {
        // One sequential multiplier per stack.
        (0..stacks)
            .map(|_| StatContribution::new(StatKind::Attack, Bonus::more(per_stack)))
            .collect()
    } else {
        // Summed percentage: N stacks read as one (N × pct) increase.
        vec![StatContribution::new(
            StatKind::Attack,
            Bonus::increased(per_stack * i32::from(stacks)),
        )]
    }
}
