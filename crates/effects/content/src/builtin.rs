//! Built-in effect catalog.
//!
//! The default catalog shipped with the game. Every behavior family has
//! at least one entry here, which doubles as living documentation of the
//! parameter names each behavior reads.

use effects_core::catalog::{
    BehaviorKind, EffectCatalog, EffectDefinition, EffectParams, Rarity,
};
use effects_core::event::{TriggerKind, TriggerSet};

/// Build the default catalog. Infallible: the definitions below are
/// validated by construction and covered by tests.
pub fn builtin_catalog() -> EffectCatalog {
    let definitions = [
        EffectDefinition::new(
            "life_seed",
            "Life Seed",
            BehaviorKind::Regeneration,
            1,
            TriggerSet::from_kinds(&[TriggerKind::FieldTick]),
        )
        .with_description("Recover a sliver of HP with every stretch of walking.")
        .with_params(EffectParams::new().set_int("hp_regen_pct", 2)),
        EffectDefinition::new(
            "survival_instinct",
            "Survival Instinct",
            BehaviorKind::EmergencyHeal,
            2,
            TriggerSet::from_kinds(&[TriggerKind::DamageTaken]),
        )
        .with_description("Once per floor, surge back when a hit leaves you near death.")
        .with_rarity(Rarity::Uncommon)
        .with_params(
            EffectParams::new()
                .set_int("hp_threshold_pct", 15)
                .set_int("emergency_heal_pct", 15)
                .set_int("uses_per_floor", 1),
        ),
        EffectDefinition::new(
            "battle_momentum",
            "Battle Momentum",
            BehaviorKind::ComboMomentum,
            2,
            TriggerSet::from_kinds(&[TriggerKind::EnemyDefeated]),
        )
        .with_description("Each kill sharpens your attack until the battle ends.")
        .with_rarity(Rarity::Uncommon)
        .with_max_stacks(5)
        .with_battle_scoped_stacks()
        .with_params(EffectParams::new().set_int("attack_inc_pct_per_stack", 10)),
        EffectDefinition::new(
            "victors_spoils",
            "Victor's Spoils",
            BehaviorKind::VictorySpoils,
            1,
            TriggerSet::from_kinds(&[TriggerKind::EnemyDefeated]),
        )
        .with_description("Downing an enemy restores a little MP, a few times per battle.")
        .with_params(
            EffectParams::new()
                .set_int("mp_restore_pct", 10)
                .set_int("uses_per_battle", 3)
                .set_int("double_restore_chance_pct", 25),
        ),
        EffectDefinition::new(
            "avengers_oath",
            "Avenger's Oath",
            BehaviorKind::AvengersOath,
            3,
            TriggerSet::from_kinds(&[TriggerKind::AllyDied]),
        )
        .with_description("Every fallen ally stokes your attack for the rest of the run.")
        .with_rarity(Rarity::Rare)
        .with_unlock_price(120)
        .with_max_stacks(3)
        .with_params(EffectParams::new().set_int("attack_inc_pct_per_stack", 20)),
        EffectDefinition::new(
            "lucky_three",
            "Lucky Three",
            BehaviorKind::LuckyNumber,
            1,
            TriggerSet::empty(),
        )
        .with_description("While your HP reads exactly 3, crits come easy.")
        .with_rarity(Rarity::Rare)
        .with_unlock_price(80)
        .with_params(
            EffectParams::new()
                .set_int("lucky_hp", 3)
                .set_int("crit_bonus", 50),
        ),
        EffectDefinition::new(
            "mind_siphon",
            "Mind Siphon",
            BehaviorKind::MindSiphon,
            2,
            TriggerSet::from_kinds(&[TriggerKind::SkillUsed]),
        )
        .with_description("Casting a skill returns part of its focus, capped per battle.")
        .with_unlock_price(60)
        .with_params(
            EffectParams::new()
                .set_int("mp_refund_pct", 5)
                .set_int("uses_per_battle", 2),
        ),
        EffectDefinition::new(
            "iron_resolve",
            "Iron Resolve",
            BehaviorKind::IronResolve,
            1,
            TriggerSet::from_kinds(&[TriggerKind::BattleStart]),
        )
        .with_description("The party braces at the first clash, hardening their defense.")
        .with_params(EffectParams::new().set_int("defense_flat", 10)),
        EffectDefinition::new(
            "second_wind",
            "Second Wind",
            BehaviorKind::SecondWind,
            2,
            TriggerSet::from_kinds(&[TriggerKind::BattleEnd]),
        )
        .with_description("Once per floor, a won battle lets the party catch its breath.")
        .with_params(
            EffectParams::new()
                .set_int("heal_pct", 10)
                .set_int("uses_per_floor", 1),
        ),
    ];

    match EffectCatalog::from_definitions(definitions) {
        Ok(catalog) => catalog,
        Err(err) => unreachable!("builtin catalog is valid by construction: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn builtin_catalog_validates() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), 9);
    }

    #[test]
    fn every_behavior_family_is_represented() {
        let catalog = builtin_catalog();
        let behaviors: BTreeSet<&str> = catalog
            .iter()
            .map(|definition| definition.behavior.as_ref())
            .collect();
        assert_eq!(behaviors.len(), 9);
    }

    #[test]
    fn free_effects_are_always_available() {
        let catalog = builtin_catalog();
        let available = catalog.list_available(&BTreeSet::new());
        // Everything without an unlock price.
        assert_eq!(available.len(), 6);
        assert!(available.iter().all(|d| d.unlock_price == 0));
    }
}
