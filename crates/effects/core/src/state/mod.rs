//! Runtime counter store for the active loadout.
//!
//! The store owns every mutable counter the engine has: one record per
//! active effect plus lazily-created `(effect, character)` sub-records.
//! All writes flow through [`EffectStateStore::mutate`]; lifecycle resets
//! are the only other mutation path. Everything else is read-only, which
//! is what makes dispatch deterministic and the store snapshotable at any
//! point between dispatches.

pub mod record;

use std::collections::{BTreeMap, BTreeSet};

use sha2::{Digest, Sha256};

use crate::catalog::EffectId;
use crate::error::StateError;
use crate::loadout::ActiveLoadout;
use crate::party::CharacterId;
pub use record::{EffectRuntimeState, MutationOp, StateMutation};

/// All runtime counters for one run's loadout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectStateStore {
    records: BTreeMap<EffectId, EffectRuntimeState>,
    character_records: BTreeMap<(EffectId, CharacterId), EffectRuntimeState>,
    /// Effects whose stacks reset on battle boundaries, captured from the
    /// loadout at init.
    battle_scoped: BTreeSet<EffectId>,
}

/// Serializable image of the store: effect id → counters.
///
/// The shape is stable and round-trippable; the on-disk byte format is
/// the save collaborator's concern.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateSnapshot {
    pub effects: BTreeMap<EffectId, EffectRuntimeState>,
    pub characters: BTreeMap<EffectId, BTreeMap<CharacterId, EffectRuntimeState>>,
    pub battle_scoped: BTreeSet<EffectId>,
}

impl EffectStateStore {
    /// Allocate one zeroed record per effect in the loadout.
    pub fn init_run(loadout: &ActiveLoadout) -> Self {
        let mut records = BTreeMap::new();
        let mut battle_scoped = BTreeSet::new();
        for definition in loadout.iter() {
            records.insert(definition.id.clone(), EffectRuntimeState::default());
            if definition.battle_scoped_stacks {
                battle_scoped.insert(definition.id.clone());
            }
        }
        Self {
            records,
            character_records: BTreeMap::new(),
            battle_scoped,
        }
    }

    /// Read a record. Missing records (a per-character sub-record that was
    /// never written, or a corrupt effect record) read as fresh zeroes.
    pub fn get(&self, id: &EffectId, character: Option<CharacterId>) -> EffectRuntimeState {
        match character {
            Some(character) => self
                .character_records
                .get(&(id.clone(), character))
                .cloned()
                .unwrap_or_default(),
            None => self.records.get(id).cloned().unwrap_or_default(),
        }
    }

    /// Mutate a record in place. This is the single point of truth for
    /// writes: a future concurrent port serializes here.
    ///
    /// A missing effect-level record is a [`StateError`]; it is recovered
    /// by reinitializing that one record to zero, never by aborting.
    pub fn mutate<R>(
        &mut self,
        id: &EffectId,
        character: Option<CharacterId>,
        f: impl FnOnce(&mut EffectRuntimeState) -> R,
    ) -> R {
        match character {
            Some(character) => {
                let record = self
                    .character_records
                    .entry((id.clone(), character))
                    .or_default();
                f(record)
            }
            None => {
                if !self.records.contains_key(id) {
                    let err = StateError::MissingRecord(id.clone());
                    tracing::warn!(%err, "state store recovered a record");
                }
                f(self.records.entry(id.clone()).or_default())
            }
        }
    }

    /// Apply a handler's requested mutation batch.
    pub fn apply(&mut self, id: &EffectId, mutation: &StateMutation) {
        self.mutate(id, mutation.scope, |record| {
            for op in &mutation.ops {
                op.apply(record);
            }
        });
    }

    /// Reset floor-scoped fields of every record.
    pub fn on_floor_start(&mut self) {
        for record in self.records.values_mut() {
            record.reset_floor_scope();
        }
        for record in self.character_records.values_mut() {
            record.reset_floor_scope();
        }
    }

    /// Reset battle-scoped fields of every record.
    pub fn on_battle_start(&mut self) {
        self.reset_battle_scope();
    }

    /// Battle end uses the same reset so stale per-battle counters can
    /// never leak into field play.
    pub fn on_battle_end(&mut self) {
        self.reset_battle_scope();
    }

    fn reset_battle_scope(&mut self) {
        for (id, record) in self.records.iter_mut() {
            record.reset_battle_scope(self.battle_scoped.contains(id));
        }
        for ((id, _), record) in self.character_records.iter_mut() {
            record.reset_battle_scope(self.battle_scoped.contains(id));
        }
    }

    /// Clone the counters into a stable, serializable shape.
    pub fn snapshot(&self) -> StateSnapshot {
        let mut characters: BTreeMap<EffectId, BTreeMap<CharacterId, EffectRuntimeState>> =
            BTreeMap::new();
        for ((id, character), record) in &self.character_records {
            characters
                .entry(id.clone())
                .or_default()
                .insert(*character, record.clone());
        }
        StateSnapshot {
            effects: self.records.clone(),
            characters,
            battle_scoped: self.battle_scoped.clone(),
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn restore(snapshot: StateSnapshot) -> Self {
        let mut character_records = BTreeMap::new();
        for (id, per_character) in snapshot.characters {
            for (character, record) in per_character {
                character_records.insert((id.clone(), character), record);
            }
        }
        Self {
            records: snapshot.effects,
            character_records,
            battle_scoped: snapshot.battle_scoped,
        }
    }

    /// SHA-256 digest over a canonical encoding of every counter.
    ///
    /// Two stores reached by identical event sequences over identical
    /// starting state produce identical digests; replay checks compare
    /// these instead of walking both maps.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (id, record) in &self.records {
            hash_record(&mut hasher, id, None, record);
        }
        for ((id, character), record) in &self.character_records {
            hash_record(&mut hasher, id, Some(*character), record);
        }
        hasher.finalize().into()
    }
}

fn hash_record(
    hasher: &mut Sha256,
    id: &EffectId,
    character: Option<CharacterId>,
    record: &EffectRuntimeState,
) {
    hasher.update((id.as_str().len() as u32).to_le_bytes());
    hasher.update(id.as_str().as_bytes());
    match character {
        Some(character) => {
            hasher.update([1u8]);
            hasher.update(character.0.to_le_bytes());
        }
        None => hasher.update([0u8]),
    }
    hasher.update([record.stacks]);
    hasher.update(record.uses_this_floor.to_le_bytes());
    hasher.update(record.uses_this_battle.to_le_bytes());
    hasher.update([u8::from(record.fired_this_floor)]);
    hasher.update([u8::from(record.fired_this_battle)]);
    hasher.update((record.counters.len() as u32).to_le_bytes());
    for (name, value) in &record.counters {
        hasher.update((name.len() as u32).to_le_bytes());
        hasher.update(name.as_bytes());
        hasher.update(value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BehaviorKind, EffectDefinition};
    use crate::event::{TriggerKind, TriggerSet};
    use crate::loadout;

    fn loadout() -> ActiveLoadout {
        let triggers = TriggerSet::from_kinds(&[TriggerKind::EnemyDefeated]);
        let catalog = crate::catalog::EffectCatalog::from_definitions([
            EffectDefinition::new("momentum", "Momentum", BehaviorKind::ComboMomentum, 2, triggers)
                .with_max_stacks(5)
                .with_battle_scoped_stacks(),
            EffectDefinition::new("oath", "Oath", BehaviorKind::AvengersOath, 2, triggers)
                .with_max_stacks(3),
        ])
        .unwrap();
        loadout::select(
            &catalog,
            &[EffectId::from("momentum"), EffectId::from("oath")],
            10,
            3,
        )
        .unwrap()
    }

    #[test]
    fn init_allocates_zeroed_records() {
        let store = EffectStateStore::init_run(&loadout());
        let record = store.get(&EffectId::from("momentum"), None);
        assert_eq!(record, EffectRuntimeState::default());
    }

    #[test]
    fn missing_per_character_record_reads_as_zero() {
        let store = EffectStateStore::init_run(&loadout());
        let record = store.get(&EffectId::from("momentum"), Some(CharacterId(2)));
        assert_eq!(record.stacks, 0);
        assert_eq!(record.counter("combo"), 0);
    }

    #[test]
    fn battle_reset_clears_scoped_stacks_per_definition() {
        let mut store = EffectStateStore::init_run(&loadout());
        let momentum = EffectId::from("momentum");
        let oath = EffectId::from("oath");
        store.mutate(&momentum, None, |r| r.stacks = 4);
        store.mutate(&oath, None, |r| r.stacks = 2);
        store.mutate(&momentum, Some(CharacterId(1)), |r| r.stacks = 3);

        store.on_battle_end();

        assert_eq!(store.get(&momentum, None).stacks, 0);
        assert_eq!(store.get(&momentum, Some(CharacterId(1))).stacks, 0);
        // Run-scoped stacks survive battle boundaries.
        assert_eq!(store.get(&oath, None).stacks, 2);
    }

    #[test]
    fn floor_and_battle_counters_zero_after_resets() {
        let mut store = EffectStateStore::init_run(&loadout());
        let id = EffectId::from("oath");
        store.mutate(&id, None, |r| {
            r.uses_this_floor = 3;
            r.uses_this_battle = 2;
            r.fired_this_floor = true;
            r.fired_this_battle = true;
        });

        store.on_battle_start();
        assert_eq!(store.get(&id, None).uses_this_battle, 0);
        assert!(!store.get(&id, None).fired_this_battle);
        assert_eq!(store.get(&id, None).uses_this_floor, 3);

        store.on_floor_start();
        assert_eq!(store.get(&id, None).uses_this_floor, 0);
        assert!(!store.get(&id, None).fired_this_floor);
    }

    #[test]
    fn snapshot_round_trips() {
        let mut store = EffectStateStore::init_run(&loadout());
        store.mutate(&EffectId::from("oath"), None, |r| {
            r.stacks = 2;
            r.counters.insert("grief".to_owned(), 7);
        });
        store.mutate(&EffectId::from("momentum"), Some(CharacterId(1)), |r| {
            r.stacks = 3;
        });

        let restored = EffectStateStore::restore(store.snapshot());
        assert_eq!(restored, store);
        assert_eq!(restored.digest(), store.digest());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_serializes_through_bincode() {
        let mut store = EffectStateStore::init_run(&loadout());
        store.mutate(&EffectId::from("oath"), None, |r| r.stacks = 2);

        let snapshot = store.snapshot();
        let bytes = bincode::serialize(&snapshot).unwrap();
        let decoded: StateSnapshot = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn digest_tracks_counter_changes() {
        let mut store = EffectStateStore::init_run(&loadout());
        let before = store.digest();
        store.mutate(&EffectId::from("oath"), None, |r| r.stacks = 1);
        let after = store.digest();
        assert_ne!(hex::encode(before), hex::encode(after));
    }
}
