//! Pure effect handlers, one per [`BehaviorKind`].
//!
//! A handler never writes anything: it reads the event, the definition,
//! the runtime records, and the party, and returns the outcomes it wants
//! emitted plus the record mutations it wants applied. The dispatcher
//! applies the mutations through the store before emitting the outcomes,
//! so use-cap bookkeeping is settled before anything becomes observable.
//!
//! Cap rule: a handler whose floor/battle use counter has reached its cap
//! returns an empty output. No message, no mutation.

use crate::catalog::EffectDefinition;
use crate::dispatch::outcome::{Outcome, OutcomeKind};
use crate::dispatch::rng::RngOracle;
use crate::event::{BattleOutcome, TriggerEvent, TriggerKind};
use crate::party::{CharacterId, CharacterState, Party, StatContribution};
use crate::state::{EffectRuntimeState, EffectStateStore, MutationOp, StateMutation};
use crate::stats::{Bonus, StatKind};

/// Read-only view a handler computes from.
pub struct HandlerInput<'a> {
    pub event: &'a TriggerEvent,
    pub definition: &'a EffectDefinition,
    /// Effect-level runtime record.
    pub state: &'a EffectRuntimeState,
    /// Full store, for per-character sub-records.
    pub store: &'a EffectStateStore,
    pub party: &'a Party,
    /// Randomness source; all rolls derive from `seed`, so replays
    /// reproduce them.
    pub rng: &'a dyn RngOracle,
    /// Seed for this (event, effect) pair.
    pub seed: u64,
}

impl HandlerInput<'_> {
    fn member(&self, id: CharacterId) -> Result<&CharacterState, HandlerError> {
        self.party
            .member(id)
            .ok_or(HandlerError::UnknownCharacter(id))
    }

    fn outcome(&self, kind: OutcomeKind) -> Outcome {
        Outcome::new(self.definition.id.clone(), kind)
    }
}

/// Everything a handler wants to happen, as data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HandlerOutput {
    pub mutations: Vec<StateMutation>,
    pub outcomes: Vec<Outcome>,
}

impl HandlerOutput {
    /// The capped / not-applicable result: nothing happens.
    pub fn none() -> Self {
        Self::default()
    }
}

/// A handler refusing to run. The dispatcher logs it and skips this
/// effect for this event only.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error("event kind {0} does not match this handler")]
    WrongEvent(TriggerKind),

    #[error("event references unknown character {0}")]
    UnknownCharacter(CharacterId),
}

/// Handlers are plain function pointers so the registry stays `Copy`-able
/// and each handler is unit-testable in isolation.
pub type EffectHandler = fn(&HandlerInput<'_>) -> Result<HandlerOutput, HandlerError>;

// ============================================================================
// Handlers
// ============================================================================

/// Regeneration: restore a percentage of each living member's max HP on
/// every field tick. Percentage is taken against the *current* maximum,
/// so repeated ticks never compound.
pub fn regeneration(input: &HandlerInput<'_>) -> Result<HandlerOutput, HandlerError> {
    let TriggerEvent::FieldTick { .. } = input.event else {
        return Err(HandlerError::WrongEvent(input.event.kind()));
    };
    let percent = input.definition.params.uint("hp_regen_pct", 0);
    let mut output = HandlerOutput::none();
    for member in input.party.members() {
        if !member.is_alive() || member.hp.current() == member.hp.maximum() {
            continue;
        }
        let amount = member.hp.percent_of_max(percent);
        if amount == 0 {
            continue;
        }
        output.outcomes.push(input.outcome(OutcomeKind::Heal {
            character: member.id,
            amount,
        }));
    }
    Ok(output)
}

/// EmergencyHeal: when damage leaves the defender at or below the HP
/// threshold, restore a percentage of max HP. Capped per floor.
pub fn emergency_heal(input: &HandlerInput<'_>) -> Result<HandlerOutput, HandlerError> {
    let TriggerEvent::DamageTaken { defender, .. } = input.event else {
        return Err(HandlerError::WrongEvent(input.event.kind()));
    };
    let uses_per_floor = input.definition.params.uint("uses_per_floor", 1);
    if input.state.uses_this_floor >= uses_per_floor {
        return Ok(HandlerOutput::none());
    }
    let member = input.member(*defender)?;
    let threshold = input.definition.params.uint("hp_threshold_pct", 0);
    if !member.is_alive() || !member.hp.at_or_below_percent(threshold) {
        return Ok(HandlerOutput::none());
    }

    let amount = member
        .hp
        .percent_of_max(input.definition.params.uint("emergency_heal_pct", 0));
    if amount == 0 {
        return Ok(HandlerOutput::none());
    }

    let mut ops = vec![MutationOp::IncrementFloorUses];
    if uses_per_floor == 1 {
        ops.push(MutationOp::MarkFiredThisFloor);
    }
    Ok(HandlerOutput {
        mutations: vec![StateMutation::effect_scope(ops)],
        outcomes: vec![
            input.outcome(OutcomeKind::Heal {
                character: member.id,
                amount,
            }),
            input.outcome(OutcomeKind::Message(format!(
                "{} kicks in: {} recovers {} HP",
                input.definition.name, member.name, amount
            ))),
        ],
    })
}

/// ComboMomentum: the victor gains a combo stack on each enemy defeat.
/// Stacks are tracked per character and feed the stat resolver.
pub fn combo_momentum(input: &HandlerInput<'_>) -> Result<HandlerOutput, HandlerError> {
    let TriggerEvent::EnemyDefeated { victor, .. } = input.event else {
        return Err(HandlerError::WrongEvent(input.event.kind()));
    };
    let member = input.member(*victor)?;
    let current = input
        .store
        .get(&input.definition.id, Some(*victor))
        .stacks;
    let next = current.saturating_add(1).min(input.definition.max_stacks);

    Ok(HandlerOutput {
        mutations: vec![StateMutation::character_scope(
            *victor,
            vec![MutationOp::AddStacks {
                delta: 1,
                max: input.definition.max_stacks,
            }],
        )],
        outcomes: vec![input.outcome(OutcomeKind::Message(format!(
            "{} rides the momentum (combo x{})",
            member.name, next
        )))],
    })
}

/// VictorySpoils: restore a percentage of the victor's max MP on each
/// enemy defeat. Capped per battle. With `double_restore_chance_pct` set,
/// a d100 roll at or below the chance doubles the restore.
pub fn victors_spoils(input: &HandlerInput<'_>) -> Result<HandlerOutput, HandlerError> {
    let TriggerEvent::EnemyDefeated { victor, .. } = input.event else {
        return Err(HandlerError::WrongEvent(input.event.kind()));
    };
    let uses_per_battle = input.definition.params.uint("uses_per_battle", 1);
    if input.state.uses_this_battle >= uses_per_battle {
        return Ok(HandlerOutput::none());
    }
    let member = input.member(*victor)?;
    let mut amount = member
        .mp
        .percent_of_max(input.definition.params.uint("mp_restore_pct", 0));
    if amount == 0 {
        return Ok(HandlerOutput::none());
    }
    let double_chance = input.definition.params.uint("double_restore_chance_pct", 0);
    if double_chance > 0 && input.rng.roll_d100(input.seed) <= double_chance {
        amount *= 2;
    }
    Ok(HandlerOutput {
        mutations: vec![StateMutation::effect_scope(vec![
            MutationOp::IncrementBattleUses,
        ])],
        outcomes: vec![input.outcome(OutcomeKind::RestoreMp {
            character: member.id,
            amount,
        })],
    })
}

/// AvengersOath: each fallen ally adds an attack stack for the rest of
/// the run (or battle, if the definition scopes its stacks).
pub fn avengers_oath(input: &HandlerInput<'_>) -> Result<HandlerOutput, HandlerError> {
    let TriggerEvent::AllyDied { character } = input.event else {
        return Err(HandlerError::WrongEvent(input.event.kind()));
    };
    let fallen = input.member(*character)?;
    Ok(HandlerOutput {
        mutations: vec![StateMutation::effect_scope(vec![MutationOp::AddStacks {
            delta: 1,
            max: input.definition.max_stacks,
        }])],
        outcomes: vec![input.outcome(OutcomeKind::Message(format!(
            "{} fuels the party's resolve",
            fallen.name
        )))],
    })
}

/// MindSiphon: refund a percentage of the caster's max MP after a skill.
/// Capped per battle.
pub fn mind_siphon(input: &HandlerInput<'_>) -> Result<HandlerOutput, HandlerError> {
    let TriggerEvent::SkillUsed { caster, .. } = input.event else {
        return Err(HandlerError::WrongEvent(input.event.kind()));
    };
    let uses_per_battle = input.definition.params.uint("uses_per_battle", 1);
    if input.state.uses_this_battle >= uses_per_battle {
        return Ok(HandlerOutput::none());
    }
    let member = input.member(*caster)?;
    let amount = member
        .mp
        .percent_of_max(input.definition.params.uint("mp_refund_pct", 0));
    if amount == 0 {
        return Ok(HandlerOutput::none());
    }
    Ok(HandlerOutput {
        mutations: vec![StateMutation::effect_scope(vec![
            MutationOp::IncrementBattleUses,
        ])],
        outcomes: vec![input.outcome(OutcomeKind::RestoreMp {
            character: member.id,
            amount,
        })],
    })
}

/// IronResolve: flat defense boost for every living member at battle
/// start; the boost lives in the character's temporary-boost list and is
/// cleared when the battle ends.
pub fn iron_resolve(input: &HandlerInput<'_>) -> Result<HandlerOutput, HandlerError> {
    let TriggerEvent::BattleStart { .. } = input.event else {
        return Err(HandlerError::WrongEvent(input.event.kind()));
    };
    if input.state.fired_this_battle {
        return Ok(HandlerOutput::none());
    }
    let defense = input.definition.params.int("defense_flat", 0) as i32;
    let mut output = HandlerOutput {
        mutations: vec![StateMutation::effect_scope(vec![
            MutationOp::MarkFiredThisBattle,
        ])],
        outcomes: Vec::new(),
    };
    for member in input.party.members() {
        if !member.is_alive() {
            continue;
        }
        output.outcomes.push(input.outcome(OutcomeKind::StatBoost {
            character: member.id,
            contribution: StatContribution::new(StatKind::Defense, Bonus::flat(defense)),
        }));
    }
    Ok(output)
}

/// SecondWind: heal the party after a victorious battle. Capped per
/// floor.
pub fn second_wind(input: &HandlerInput<'_>) -> Result<HandlerOutput, HandlerError> {
    let TriggerEvent::BattleEnd { outcome } = input.event else {
        return Err(HandlerError::WrongEvent(input.event.kind()));
    };
    if *outcome != BattleOutcome::Victory {
        return Ok(HandlerOutput::none());
    }
    let uses_per_floor = input.definition.params.uint("uses_per_floor", 1);
    if input.state.uses_this_floor >= uses_per_floor {
        return Ok(HandlerOutput::none());
    }
    let percent = input.definition.params.uint("heal_pct", 0);
    let mut outcomes = Vec::new();
    for member in input.party.members() {
        if !member.is_alive() || member.hp.current() == member.hp.maximum() {
            continue;
        }
        let amount = member.hp.percent_of_max(percent);
        if amount == 0 {
            continue;
        }
        outcomes.push(input.outcome(OutcomeKind::Heal {
            character: member.id,
            amount,
        }));
    }
    if outcomes.is_empty() {
        // Nothing to heal: do not burn the floor use.
        return Ok(HandlerOutput::none());
    }
    Ok(HandlerOutput {
        mutations: vec![StateMutation::effect_scope(vec![
            MutationOp::IncrementFloorUses,
        ])],
        outcomes,
    })
}
