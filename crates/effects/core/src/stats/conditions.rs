//! State-conditional stat rules.
//!
//! Conditional rules are pure functions of the character's *current*
//! HP/MP, evaluated fresh on every resolver call. They must never be
//! cached across a HP/MP change, so there is deliberately no memoization
//! anywhere in this module.

use crate::catalog::{BehaviorKind, EffectDefinition};
use crate::party::{CharacterState, StatContribution};
use crate::stats::{Bonus, StatKind};

/// Conditional contributions from one effect for one character.
pub fn conditional_contributions(
    definition: &EffectDefinition,
    character: &CharacterState,
) -> Vec<StatContribution> {
    match definition.behavior {
        BehaviorKind::LuckyNumber => lucky_number(definition, character),
        _ => Vec::new(),
    }
}

/// Bonus crit chance while current HP equals the lucky value exactly.
fn lucky_number(
    definition: &EffectDefinition,
    character: &CharacterState,
) -> Vec<StatContribution> {
    let lucky_hp = definition.params.uint("lucky_hp", 0);
    if lucky_hp == 0 || character.hp.current() != lucky_hp {
        return Vec::new();
    }
    let crit_bonus = definition.params.int("crit_bonus", 0) as i32;
    vec![StatContribution::new(
        StatKind::CritChance,
        Bonus::flat(crit_bonus),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EffectParams;
    use crate::event::TriggerSet;
    use crate::party::{BaseStats, CharacterId};

    fn lucky_three() -> EffectDefinition {
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
                .set_int("crit_bonus", 50),
        )
    }

    fn character_at(hp: u32) -> CharacterState {
        let mut character =
            CharacterState::new(CharacterId(0), "mia", BaseStats::default(), 100, 20);
        character.hp.deplete(100 - hp);
        character
    }

    #[test]
    fn fires_on_exact_hp_only() {
        let definition = lucky_three();
        assert_eq!(
            conditional_contributions(&definition, &character_at(3)),
            vec![StatContribution::new(StatKind::CritChance, Bonus::flat(50))]
        );
        assert!(conditional_contributions(&definition, &character_at(2)).is_empty());
        assert!(conditional_contributions(&definition, &character_at(4)).is_empty());
    }

    #[test]
    fn reevaluates_after_hp_change() {
        let definition = lucky_three();
        let mut character = character_at(3);
        assert_eq!(conditional_contributions(&definition, &character).len(), 1);
        character.hp.deplete(1);
        assert!(conditional_contributions(&definition, &character).is_empty());
    }
}
