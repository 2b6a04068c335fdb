//! On-demand stat resolution.

use std::collections::BTreeMap;

use crate::loadout::ActiveLoadout;
use crate::party::CharacterState;
use crate::state::EffectStateStore;
use crate::stats::{BonusStack, CharacterStatSnapshot, StatKind, conditions, contributions};

/// Compute a character's effective stats.
///
/// The fold order is fixed: base stats, then equipment, then temporary
/// boosts, then active-effect contributions in loadout order, then
/// conditional rules (also loadout order). Ordering by loadout rather
/// than by event arrival keeps same-category stacking deterministic.
///
/// Pure: reads `(character, loadout, store)`, mutates nothing.
pub fn compute(
    character: &CharacterState,
    loadout: &ActiveLoadout,
    store: &EffectStateStore,
) -> CharacterStatSnapshot {
    let mut stacks: BTreeMap<StatKind, BonusStack> = BTreeMap::new();

    for contribution in character.equipment.iter().chain(character.boosts.iter()) {
        stacks
            .entry(contribution.stat)
            .or_default()
            .add(contribution.bonus);
    }

    for definition in loadout.iter() {
        let effect_state = store.get(&definition.id, None);
        let character_state = store.get(&definition.id, Some(character.id));
        for contribution in
            contributions::passive_contributions(definition, &effect_state, &character_state)
        {
            stacks
                .entry(contribution.stat)
                .or_default()
                .add(contribution.bonus);
        }
    }

    for definition in loadout.iter() {
        for contribution in conditions::conditional_contributions(definition, character) {
            stacks
                .entry(contribution.stat)
                .or_default()
                .add(contribution.bonus);
        }
    }

    let apply = |kind: StatKind, base: i32| -> i32 {
        match stacks.get(&kind) {
            Some(stack) => stack.apply(base, kind.bounds()),
            None => base.clamp(kind.bounds().min, kind.bounds().max),
        }
    };

    let hp_max = apply(StatKind::MaxHp, character.hp.maximum() as i32) as u32;
    let mp_max = apply(StatKind::MaxMp, character.mp.maximum() as i32) as u32;

    CharacterStatSnapshot {
        attack: apply(StatKind::Attack, character.base.attack),
        defense: apply(StatKind::Defense, character.base.defense),
        magic: apply(StatKind::Magic, character.base.magic),
        speed: apply(StatKind::Speed, character.base.speed),
        luck: apply(StatKind::Luck, character.base.luck),
        crit_chance: apply(StatKind::CritChance, character.base.crit_chance),
        hp_max,
        mp_max,
        // Current never exceeds the effective maximum, even if a +max
        // contribution just went away.
        hp: character.hp.current().min(hp_max),
        mp: character.mp.current().min(mp_max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BehaviorKind, EffectCatalog, EffectDefinition, EffectParams};
    use crate::event::{TriggerKind, TriggerSet};
    use crate::loadout;
    use crate::party::{BaseStats, CharacterId, StatContribution};
    use crate::stats::Bonus;

    fn fixture() -> (CharacterState, ActiveLoadout, EffectStateStore) {
        let catalog = EffectCatalog::from_definitions([
            EffectDefinition::new(
                "oath",
                "Avenger's Oath",
                BehaviorKind::AvengersOath,
                2,
                TriggerSet::from_kinds(&[TriggerKind::AllyDied]),
            )
            .with_max_stacks(3)
            .with_params(EffectParams::new().set_int("attack_inc_pct_per_stack", 20)),
            EffectDefinition::new(
                "lucky_three",
                "Lucky Three",
                BehaviorKind::LuckyNumber,
                1,
                TriggerSet::empty(),
            )
            .with_params(
                EffectParams::new()
                    .set_int("lucky_hp", 3)
                    .set_int("crit_bonus", 40),
            ),
        ])
        .unwrap();
        let loadout = loadout::select(
            &catalog,
            &["oath".into(), "lucky_three".into()],
            5,
            3,
        )
        .unwrap();
        let store = EffectStateStore::init_run(&loadout);

        let mut character = CharacterState::new(
            CharacterId(0),
            "rook",
            BaseStats {
                attack: 50,
                defense: 30,
                magic: 10,
                speed: 20,
                luck: 5,
                crit_chance: 10,
            },
            100,
            20,
        );
        character
            .equipment
            .push(StatContribution::new(StatKind::Attack, Bonus::flat(10)));
        (character, loadout, store)
    }

    #[test]
    fn folds_base_equipment_and_effect_layers() {
        let (character, loadout, mut store) = fixture();
        store.mutate(&"oath".into(), None, |record| record.stacks = 2);

        let snapshot = compute(&character, &loadout, &store);
        // (50 + 10) × 1.40 = 84
        assert_eq!(snapshot.attack, 84);
        assert_eq!(snapshot.defense, 30);
        assert_eq!(snapshot.hp(), (100, 100));
    }

    #[test]
    fn conditional_rule_tracks_current_hp() {
        let (mut character, loadout, store) = fixture();
        assert_eq!(compute(&character, &loadout, &store).crit_chance, 10);

        character.hp.deplete(97); // exactly 3 HP left
        assert_eq!(compute(&character, &loadout, &store).crit_chance, 50);

        character.hp.restore(1);
        assert_eq!(compute(&character, &loadout, &store).crit_chance, 10);
    }

    #[test]
    fn compute_is_pure() {
        let (character, loadout, mut store) = fixture();
        store.mutate(&"oath".into(), None, |record| record.stacks = 1);

        let first = compute(&character, &loadout, &store);
        let second = compute(&character, &loadout, &store);
        assert_eq!(first, second);
        // Inputs unchanged by computation.
        assert_eq!(store.get(&"oath".into(), None).stacks, 1);
    }

    #[test]
    fn temporary_boosts_participate_in_fold() {
        let (mut character, loadout, store) = fixture();
        character
            .boosts
            .push(StatContribution::new(StatKind::Defense, Bonus::flat(15)));
        let snapshot = compute(&character, &loadout, &store);
        assert_eq!(snapshot.defense, 45);
    }
}
