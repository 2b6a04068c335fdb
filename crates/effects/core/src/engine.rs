//! Run-level facade over the passive-effect subsystem.
//!
//! [`PassiveEngine`] owns the loadout, the dispatcher, the state store,
//! and the step counter for one run, and brackets the external
//! collaborators' lifecycles: the field step counter feeds
//! [`PassiveEngine::record_step`], the combat orchestrator brackets its
//! loop with [`PassiveEngine::begin_battle`] / [`PassiveEngine::end_battle`]
//! and forwards combat events through [`PassiveEngine::handle_event`].
//! Every dispatch is synchronous and bounded by the loadout size.

use crate::config::EngineConfig;
use crate::dispatch::{DispatchContext, Outcome, PcgRng, TriggerDispatcher};
use crate::event::{BattleOutcome, TriggerEvent};
use crate::field::StepCounter;
use crate::loadout::{ActiveLoadout, LoadoutEntry};
use crate::party::{CharacterId, Party};
use crate::state::{EffectStateStore, StateSnapshot};
use crate::stats::{self, CharacterStatSnapshot};

/// The passive-effect engine for one run.
pub struct PassiveEngine {
    config: EngineConfig,
    dispatcher: TriggerDispatcher,
    store: EffectStateStore,
    steps: StepCounter,
    rng: PcgRng,
    /// Seed fixed at run start; combined with the event nonce so every
    /// dispatch draws from a distinct, reproducible stream.
    run_seed: u64,
    nonce: u64,
}

impl PassiveEngine {
    /// Start a run with a validated loadout.
    pub fn new(config: EngineConfig, loadout: ActiveLoadout, run_seed: u64) -> Self {
        let store = EffectStateStore::init_run(&loadout);
        let steps = StepCounter::new(config.field_tick_period);
        Self {
            config,
            dispatcher: TriggerDispatcher::new(loadout),
            store,
            steps,
            rng: PcgRng,
            run_seed,
            nonce: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn loadout(&self) -> &ActiveLoadout {
        self.dispatcher.loadout()
    }

    pub fn store(&self) -> &EffectStateStore {
        &self.store
    }

    /// UI listing of the active effects.
    pub fn active_effects(&self) -> Vec<LoadoutEntry> {
        self.loadout().entries()
    }

    /// Record one field movement step; dispatches a `FieldTick` when the
    /// step counter crosses the period.
    pub fn record_step(&mut self, floor_id: u32, party: &mut Party) -> Vec<Outcome> {
        match self.steps.advance(floor_id) {
            Some(event) => self.dispatch(&event, party),
            None => Vec::new(),
        }
    }

    /// Floor transition: floor-scoped counters reset, tick phase does not.
    pub fn begin_floor(&mut self) {
        self.store.on_floor_start();
    }

    /// Bracket the start of an externally-driven battle.
    pub fn begin_battle(&mut self, party: &mut Party, enemies: Vec<String>) -> Vec<Outcome> {
        self.store.on_battle_start();
        let event = TriggerEvent::BattleStart {
            party: party.ids(),
            enemies,
        };
        self.dispatch(&event, party)
    }

    /// Bracket the end of a battle. The `BattleEnd` event dispatches
    /// while per-battle counters are still valid; then battle scope
    /// resets and temporary boosts are dropped.
    pub fn end_battle(&mut self, outcome: BattleOutcome, party: &mut Party) -> Vec<Outcome> {
        let event = TriggerEvent::BattleEnd { outcome };
        let outcomes = self.dispatch(&event, party);
        self.store.on_battle_end();
        party.clear_boosts();
        outcomes
    }

    /// Forward a combat or status event from an external collaborator.
    pub fn handle_event(&mut self, event: &TriggerEvent, party: &mut Party) -> Vec<Outcome> {
        self.dispatch(event, party)
    }

    /// Effective stats for one party member, resolved on demand.
    pub fn resolve_stats(&self, party: &Party, id: CharacterId) -> Option<CharacterStatSnapshot> {
        party
            .member(id)
            .map(|character| stats::compute(character, self.loadout(), &self.store))
    }

    /// Serializable image of all runtime counters.
    pub fn snapshot_state(&self) -> StateSnapshot {
        self.store.snapshot()
    }

    /// Replace the store with a previously captured snapshot.
    pub fn restore_state(&mut self, snapshot: StateSnapshot) {
        self.store = EffectStateStore::restore(snapshot);
    }

    /// Canonical digest of the store, for replay checks.
    pub fn state_digest(&self) -> [u8; 32] {
        self.store.digest()
    }

    fn dispatch(&mut self, event: &TriggerEvent, party: &mut Party) -> Vec<Outcome> {
        let seed = self.run_seed.wrapping_add(self.nonce);
        self.nonce += 1;
        let mut ctx = DispatchContext::new(party, &mut self.store, &self.rng, seed);
        self.dispatcher.dispatch(event, &mut ctx)
    }
}
