//! Trigger dispatch.
//!
//! [`TriggerDispatcher::dispatch`] walks the active loadout in stable
//! selection order, invokes the handler registered for the event kind,
//! applies the handler's record mutations through the store, then applies
//! and emits its outcomes. One misbehaving effect never takes the tick
//! down: handler errors and invalid deltas are logged and that single
//! effect is skipped for that event.

pub mod context;
pub mod handlers;
pub mod outcome;
pub mod registry;
pub mod rng;

pub use context::DispatchContext;
pub use handlers::{EffectHandler, HandlerError, HandlerInput, HandlerOutput};
pub use outcome::{Outcome, OutcomeKind};
pub use registry::HandlerRegistry;
pub use rng::{PcgRng, RngOracle};

use crate::error::DispatchError;
use crate::event::TriggerEvent;
use crate::loadout::ActiveLoadout;
use crate::party::Party;

/// Routes trigger events to the active loadout's handlers.
pub struct TriggerDispatcher {
    loadout: ActiveLoadout,
    registry: HandlerRegistry,
}

impl TriggerDispatcher {
    /// Build the dispatcher (and its handler registry) for one run.
    pub fn new(loadout: ActiveLoadout) -> Self {
        let registry = HandlerRegistry::build(&loadout);
        Self { loadout, registry }
    }

    pub fn loadout(&self) -> &ActiveLoadout {
        &self.loadout
    }

    /// Dispatch one event against the store and party in `ctx`.
    ///
    /// Determinism contract: identical event sequences over identical
    /// starting state produce identical outcome sequences and identical
    /// final store contents.
    pub fn dispatch(&self, event: &TriggerEvent, ctx: &mut DispatchContext<'_>) -> Vec<Outcome> {
        let kind = event.kind();
        let mut outcomes = Vec::new();
        let mut subscribed = false;

        for (index, definition) in self.loadout.iter().enumerate() {
            if !definition.triggers.contains_kind(kind) {
                continue;
            }
            subscribed = true;
            let Some(handler) = self.registry.get(kind, &definition.id) else {
                tracing::debug!(effect = %definition.id, %kind, "no handler registered");
                continue;
            };

            let state = ctx.store.get(&definition.id, None);
            let result = {
                let input = HandlerInput {
                    event,
                    definition,
                    state: &state,
                    store: ctx.store,
                    party: ctx.party,
                    rng: ctx.rng,
                    // Offset by loadout position so effects sharing an
                    // event draw distinct rolls.
                    seed: ctx.seed.wrapping_add(index as u64),
                };
                handler(&input)
            };
            let output = match result {
                Ok(output) => output,
                Err(err) => {
                    let err = DispatchError::HandlerFailed {
                        effect: definition.id.clone(),
                        reason: err.to_string(),
                    };
                    tracing::warn!(%err, "skipping effect for this event");
                    continue;
                }
            };
            if let Err(reason) = validate_output(&output, ctx.party) {
                let err = DispatchError::InvalidDelta {
                    effect: definition.id.clone(),
                    reason,
                };
                tracing::warn!(%err, "skipping effect for this event");
                continue;
            }

            // Settle bookkeeping before anything becomes observable, so
            // use caps hold even if outcome application changes HP/MP.
            for mutation in &output.mutations {
                ctx.store.apply(&definition.id, mutation);
            }
            for outcome in output.outcomes {
                apply_outcome(&outcome, ctx.party);
                outcomes.push(outcome);
            }
        }

        if !subscribed {
            tracing::trace!(%kind, "event ignored: no active effect subscribes");
        }
        outcomes
    }
}

/// Reject deltas the party cannot absorb before any of them apply.
fn validate_output(output: &HandlerOutput, party: &Party) -> Result<(), String> {
    for outcome in &output.outcomes {
        let target = match &outcome.kind {
            OutcomeKind::Heal { character, amount }
            | OutcomeKind::Damage { character, amount }
            | OutcomeKind::RestoreMp { character, amount } => {
                if *amount == 0 {
                    return Err("zero-amount resource delta".to_owned());
                }
                Some(*character)
            }
            OutcomeKind::StatBoost { character, .. } => Some(*character),
            OutcomeKind::Message(_) => None,
        };
        if let Some(id) = target {
            if party.member(id).is_none() {
                return Err(format!("delta targets unknown character {id}"));
            }
        }
    }
    Ok(())
}

fn apply_outcome(outcome: &Outcome, party: &mut Party) {
    let member = match &outcome.kind {
        OutcomeKind::Heal { character, .. }
        | OutcomeKind::Damage { character, .. }
        | OutcomeKind::RestoreMp { character, .. }
        | OutcomeKind::StatBoost { character, .. } => party.member_mut(*character),
        OutcomeKind::Message(_) => None,
    };
    let Some(member) = member else {
        return;
    };
    match &outcome.kind {
        OutcomeKind::Heal { amount, .. } => member.hp.restore(*amount),
        OutcomeKind::Damage { amount, .. } => member.hp.deplete(*amount),
        OutcomeKind::RestoreMp { amount, .. } => member.mp.restore(*amount),
        OutcomeKind::StatBoost { contribution, .. } => member.boosts.push(contribution.clone()),
        OutcomeKind::Message(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BehaviorKind, EffectCatalog, EffectDefinition, EffectParams};
    use crate::event::{TriggerKind, TriggerSet};
    use crate::loadout;
    use crate::party::{BaseStats, CharacterId, CharacterState};
    use crate::state::EffectStateStore;

    fn catalog() -> EffectCatalog {
        EffectCatalog::from_definitions([
            EffectDefinition::new(
                "life_seed",
                "Life Seed",
                BehaviorKind::Regeneration,
                1,
                TriggerSet::from_kinds(&[TriggerKind::FieldTick]),
            )
            .with_params(EffectParams::new().set_int("hp_regen_pct", 2)),
            EffectDefinition::new(
                "survival_instinct",
                "Survival Instinct",
                BehaviorKind::EmergencyHeal,
                2,
                TriggerSet::from_kinds(&[TriggerKind::DamageTaken]),
            )
            .with_params(
                EffectParams::new()
                    .set_int("hp_threshold_pct", 15)
                    .set_int("emergency_heal_pct", 15)
                    .set_int("uses_per_floor", 1),
            ),
            EffectDefinition::new(
                "momentum",
                "Battle Momentum",
                BehaviorKind::ComboMomentum,
                2,
                TriggerSet::from_kinds(&[TriggerKind::EnemyDefeated]),
            )
            .with_max_stacks(5)
            .with_battle_scoped_stacks()
            .with_params(EffectParams::new().set_int("attack_inc_pct_per_stack", 10)),
            EffectDefinition::new(
                "spoils",
                "Victor's Spoils",
                BehaviorKind::VictorySpoils,
                1,
                TriggerSet::from_kinds(&[TriggerKind::EnemyDefeated]),
            )
            .with_params(
                EffectParams::new()
                    .set_int("mp_restore_pct", 10)
                    .set_int("uses_per_battle", 2),
            ),
        ])
        .unwrap()
    }

    fn party() -> Party {
        let mut rook = CharacterState::new(CharacterId(0), "rook", BaseStats::default(), 100, 20);
        rook.hp.deplete(50);
        rook.mp.deplete(20);
        Party::new(vec![rook])
    }

    fn dispatcher(ids: &[&str]) -> TriggerDispatcher {
        let ids: Vec<_> = ids.iter().map(|id| (*id).into()).collect();
        TriggerDispatcher::new(loadout::select(&catalog(), &ids, 10, 3).unwrap())
    }

    #[test]
    fn field_tick_heals_via_regeneration() {
        let dispatcher = dispatcher(&["life_seed"]);
        let mut party = party();
        let mut store = EffectStateStore::init_run(dispatcher.loadout());
        let rng = PcgRng;
        let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, 0);

        let outcomes = dispatcher.dispatch(
            &TriggerEvent::FieldTick {
                step_count: 20,
                floor_id: 1,
            },
            &mut ctx,
        );
        assert_eq!(outcomes.len(), 1);
        assert_eq!(party.member(CharacterId(0)).unwrap().hp.current(), 52);
    }

    #[test]
    fn per_floor_cap_yields_single_outcome() {
        let dispatcher = dispatcher(&["survival_instinct"]);
        let mut party = party();
        party.member_mut(CharacterId(0)).unwrap().hp.deplete(40); // 10/100
        let mut store = EffectStateStore::init_run(dispatcher.loadout());
        let rng = PcgRng;

        let event = TriggerEvent::DamageTaken {
            defender: CharacterId(0),
            attacker: None,
            amount: 40,
            is_critical: false,
        };

        let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, 0);
        let first = dispatcher.dispatch(&event, &mut ctx);
        assert_eq!(first.len(), 2); // heal + message
        assert_eq!(party.member(CharacterId(0)).unwrap().hp.current(), 25);

        // Drop below the threshold again: the cap holds.
        party.member_mut(CharacterId(0)).unwrap().hp.deplete(15);
        let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, 1);
        let second = dispatcher.dispatch(&event, &mut ctx);
        assert!(second.is_empty());

        // A new floor re-arms the effect.
        store.on_floor_start();
        let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, 2);
        let third = dispatcher.dispatch(&event, &mut ctx);
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn per_battle_cap_stops_and_rearms_on_battle_end() {
        let dispatcher = dispatcher(&["spoils"]);
        let mut party = party();
        let mut store = EffectStateStore::init_run(dispatcher.loadout());
        let rng = PcgRng;
        let event = TriggerEvent::EnemyDefeated {
            enemy: "slime".to_owned(),
            victor: CharacterId(0),
        };

        for nonce in 0..2u64 {
            let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, nonce);
            assert_eq!(dispatcher.dispatch(&event, &mut ctx).len(), 1);
        }
        assert_eq!(party.member(CharacterId(0)).unwrap().mp.current(), 4);

        // Third kill in the same battle: the cap holds.
        let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, 2);
        assert!(dispatcher.dispatch(&event, &mut ctx).is_empty());
        assert_eq!(store.get(&"spoils".into(), None).uses_this_battle, 2);

        // A battle boundary re-arms the effect.
        store.on_battle_end();
        let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, 3);
        assert_eq!(dispatcher.dispatch(&event, &mut ctx).len(), 1);
        assert_eq!(party.member(CharacterId(0)).unwrap().mp.current(), 6);
    }

    #[test]
    fn effects_fire_in_loadout_order_not_subscription_order() {
        // "spoils" listed before "momentum": outcomes follow that order.
        let dispatcher = dispatcher(&["spoils", "momentum"]);
        let mut party = party();
        let mut store = EffectStateStore::init_run(dispatcher.loadout());
        let rng = PcgRng;
        let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, 0);

        let outcomes = dispatcher.dispatch(
            &TriggerEvent::EnemyDefeated {
                enemy: "slime".to_owned(),
                victor: CharacterId(0),
            },
            &mut ctx,
        );
        assert_eq!(outcomes[0].effect, "spoils".into());
        assert_eq!(outcomes[1].effect, "momentum".into());
    }

    #[test]
    fn failed_handler_does_not_stop_dispatch() {
        let dispatcher = dispatcher(&["momentum", "spoils"]);
        let mut party = party();
        let mut store = EffectStateStore::init_run(dispatcher.loadout());
        let rng = PcgRng;
        let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, 0);

        // The victor is not in the party: both handlers fail, dispatch
        // finishes anyway and no record is touched.
        let outcomes = dispatcher.dispatch(
            &TriggerEvent::EnemyDefeated {
                enemy: "slime".to_owned(),
                victor: CharacterId(9),
            },
            &mut ctx,
        );
        assert!(outcomes.is_empty());
        // Neither record was touched.
        assert_eq!(store.get(&"momentum".into(), Some(CharacterId(9))).stacks, 0);
        assert_eq!(store.get(&"spoils".into(), None).uses_this_battle, 0);
    }

    #[test]
    fn dispatch_is_deterministic() {
        let events = [
            TriggerEvent::FieldTick {
                step_count: 20,
                floor_id: 1,
            },
            TriggerEvent::EnemyDefeated {
                enemy: "slime".to_owned(),
                victor: CharacterId(0),
            },
            TriggerEvent::EnemyDefeated {
                enemy: "bat".to_owned(),
                victor: CharacterId(0),
            },
        ];

        let run = || {
            let dispatcher = dispatcher(&["life_seed", "momentum", "spoils"]);
            let mut party = party();
            let mut store = EffectStateStore::init_run(dispatcher.loadout());
            let rng = PcgRng;
            let mut log = Vec::new();
            for (nonce, event) in events.iter().enumerate() {
                let mut ctx = DispatchContext::new(&mut party, &mut store, &rng, nonce as u64);
                log.extend(dispatcher.dispatch(event, &mut ctx));
            }
            (log, store.digest())
        };

        let (log_a, digest_a) = run();
        let (log_b, digest_b) = run();
        assert_eq!(log_a, log_b);
        assert_eq!(digest_a, digest_b);
    }
}
