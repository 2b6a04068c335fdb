//! Effect catalog loader.
//!
//! Loads effect definitions from RON files. The file-level shape is
//! [`EffectSpec`], which keeps enums as strings so catalog files stay
//! readable; specs are converted into [`EffectDefinition`]s after
//! parsing and then validated through [`EffectCatalog::from_definitions`].

use std::collections::BTreeMap;
use std::path::Path;

use effects_core::catalog::{
    BehaviorKind, EffectCatalog, EffectDefinition, EffectParams, Rarity,
};
use effects_core::event::{TriggerKind, TriggerSet};

use crate::loaders::{LoadResult, read_file};

/// File-level shape of one effect definition.
///
/// RON format: `Vec<EffectSpec>`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EffectSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: u32,
    #[serde(default)]
    pub unlock_price: u32,
    #[serde(default = "default_rarity")]
    pub rarity: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    pub behavior: String,
    #[serde(default)]
    pub params: BTreeMap<String, i64>,
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u8,
    #[serde(default)]
    pub battle_scoped_stacks: bool,
    #[serde(default)]
    pub multiplicative_stacking: bool,
}

fn default_rarity() -> String {
    "common".to_owned()
}

fn default_max_stacks() -> u8 {
    1
}

impl EffectSpec {
    /// Convert the file-level spec into a core definition.
    ///
    /// String fields are parsed case-insensitively through the core
    /// enums, so `"field_tick"` and `"FieldTick"` both resolve.
    pub fn into_definition(self) -> LoadResult<EffectDefinition> {
        let behavior: BehaviorKind = self.behavior.parse().map_err(|_| {
            anyhow::anyhow!(
                "Unknown behavior '{}' for effect '{}'",
                self.behavior,
                self.id
            )
        })?;

        let rarity: Rarity = self.rarity.parse().map_err(|_| {
            anyhow::anyhow!("Unknown rarity '{}' for effect '{}'", self.rarity, self.id)
        })?;

        let mut kinds = Vec::with_capacity(self.triggers.len());
        for trigger in &self.triggers {
            let kind: TriggerKind = trigger.parse().map_err(|_| {
                anyhow::anyhow!("Unknown trigger '{}' for effect '{}'", trigger, self.id)
            })?;
            kinds.push(kind);
        }

        let mut params = EffectParams::new();
        for (name, value) in self.params {
            params = params.set_int(name, value);
        }
        for (name, value) in self.flags {
            params = params.set_flag(name, value);
        }

        let mut definition = EffectDefinition::new(
            self.id.as_str(),
            self.name,
            behavior,
            self.cost,
            TriggerSet::from_kinds(&kinds),
        )
        .with_description(self.description)
        .with_unlock_price(self.unlock_price)
        .with_rarity(rarity)
        .with_params(params)
        .with_max_stacks(self.max_stacks);
        if self.battle_scoped_stacks {
            definition = definition.with_battle_scoped_stacks();
        }
        definition.multiplicative_stacking = self.multiplicative_stacking;

        Ok(definition)
    }
}

/// Loader for effect catalogs from RON files.
pub struct EffectsLoader;

impl EffectsLoader {
    /// Load an effect catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<EffectCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse an effect catalog from a RON string.
    pub fn parse(content: &str) -> LoadResult<EffectCatalog> {
        let specs: Vec<EffectSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse effect catalog RON: {}", e))?;

        let mut definitions = Vec::with_capacity(specs.len());
        for spec in specs {
            definitions.push(spec.into_definition()?);
        }

        EffectCatalog::from_definitions(definitions)
            .map_err(|e| anyhow::anyhow!("Invalid effect catalog: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_RON: &str = r#"[
        (
            id: "life_seed",
            name: "Life Seed",
            description: "Recover a sliver of HP with every stretch of walking.",
            cost: 1,
            triggers: ["field_tick"],
            behavior: "regeneration",
            params: { "hp_regen_pct": 2 },
        ),
        (
            id: "battle_momentum",
            name: "Battle Momentum",
            cost: 2,
            rarity: "uncommon",
            triggers: ["enemy_defeated"],
            behavior: "combo_momentum",
            params: { "attack_inc_pct_per_stack": 10 },
            max_stacks: 5,
            battle_scoped_stacks: true,
        ),
    ]"#;

    #[test]
    fn parses_catalog_from_ron() {
        let catalog = EffectsLoader::parse(CATALOG_RON).unwrap();
        assert_eq!(catalog.len(), 2);

        let life_seed = catalog.get(&"life_seed".into()).unwrap();
        assert_eq!(life_seed.behavior, BehaviorKind::Regeneration);
        assert_eq!(life_seed.params.int("hp_regen_pct", 0), 2);
        assert!(life_seed.triggers.contains_kind(TriggerKind::FieldTick));
        assert_eq!(life_seed.max_stacks, 1);

        let momentum = catalog.get(&"battle_momentum".into()).unwrap();
        assert_eq!(momentum.rarity, Rarity::Uncommon);
        assert_eq!(momentum.max_stacks, 5);
        assert!(momentum.battle_scoped_stacks);
    }

    #[test]
    fn rejects_unknown_behavior() {
        let err = EffectsLoader::parse(
            r#"[(id: "x", name: "X", cost: 1, behavior: "time_travel")]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("time_travel"));
    }

    #[test]
    fn rejects_unknown_trigger() {
        let err = EffectsLoader::parse(
            r#"[(id: "x", name: "X", cost: 1, triggers: ["eclipse"], behavior: "regeneration")]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("eclipse"));
    }

    #[test]
    fn catalog_validation_still_applies() {
        let err = EffectsLoader::parse(
            r#"[(id: "x", name: "X", cost: 0, behavior: "regeneration")]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid effect catalog"));
    }
}
