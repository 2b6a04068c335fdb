//! Immutable registry of passive-effect definitions.
//!
//! Definitions are loaded once at startup (see the `effects-content`
//! crate for the RON loader) and never mutated afterwards. A definition
//! binds an identifier to a [`BehaviorKind`] plus numeric parameters; the
//! behavior names the handler family, the parameters tune it. All numeric
//! parameters are integers (percentages where fractional tuning is
//! needed) so every computation stays deterministic.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::EngineConfig;
use crate::error::CatalogError;
use crate::event::TriggerSet;

/// Identifies an effect definition, e.g. `"life_seed"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EffectId(pub String);

impl EffectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EffectId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Rarity tier, used by selection UI for ordering and presentation.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Handler family an effect definition binds to.
///
/// Behaviors are the structural contract any ability must satisfy: each
/// variant has exactly one pure handler (see `dispatch::handlers`) and/or
/// one stat-contribution rule (see `stats`). Which narrative abilities
/// use which behavior is catalog data, not engine code.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BehaviorKind {
    /// Restore a percentage of max HP on every field tick.
    /// Params: `hp_regen_pct`.
    Regeneration,
    /// Emergency heal when damage leaves the defender at or below a
    /// threshold. Params: `hp_threshold_pct`, `emergency_heal_pct`,
    /// `uses_per_floor`.
    EmergencyHeal,
    /// Per-victor combo stacks on enemy defeat; each stack raises attack.
    /// Params: `attack_inc_pct_per_stack`. Stacks are battle-scoped.
    ComboMomentum,
    /// Restore a percentage of the victor's max MP on enemy defeat.
    /// Params: `mp_restore_pct`, `uses_per_battle`, and optionally
    /// `double_restore_chance_pct` (d100 roll doubles the restore).
    VictorySpoils,
    /// Gain an attack stack each time an ally dies.
    /// Params: `attack_inc_pct_per_stack`.
    AvengersOath,
    /// Pure conditional rule: bonus crit chance while current HP equals
    /// an exact value. Params: `lucky_hp`, `crit_bonus`. No triggers.
    LuckyNumber,
    /// Refund a percentage of max MP after using a skill.
    /// Params: `mp_refund_pct`, `uses_per_battle`.
    MindSiphon,
    /// Flat defense boost granted to the whole party at battle start,
    /// cleared when the battle ends. Params: `defense_flat`.
    IronResolve,
    /// Heal the party after a victorious battle.
    /// Params: `heal_pct`, `uses_per_floor`.
    SecondWind,
}

/// A single effect parameter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    Int(i64),
    Flag(bool),
}

/// Ordered name → value parameter map for one definition.
///
/// Lookups never fail: a missing name yields the caller's default. This
/// keeps handlers total over sparse catalog data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EffectParams(BTreeMap<String, ParamValue>);

impl EffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_int(mut self, name: impl Into<String>, value: i64) -> Self {
        self.0.insert(name.into(), ParamValue::Int(value));
        self
    }

    pub fn set_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.0.insert(name.into(), ParamValue::Flag(value));
        self
    }

    pub fn int(&self, name: &str, default: i64) -> i64 {
        match self.0.get(name) {
            Some(ParamValue::Int(value)) => *value,
            _ => default,
        }
    }

    /// Integer read coerced to `u32`; negative values clamp to zero.
    pub fn uint(&self, name: &str, default: u32) -> u32 {
        self.int(name, i64::from(default)).max(0) as u32
    }

    pub fn flag(&self, name: &str, default: bool) -> bool {
        match self.0.get(name) {
            Some(ParamValue::Flag(value)) => *value,
            _ => default,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// One immutable passive-effect definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub id: EffectId,
    pub name: String,
    pub description: String,
    /// Selection cost, validated into `1..=10` on catalog insert.
    pub cost: u32,
    /// Currency price to unlock; 0 means always available.
    pub unlock_price: u32,
    pub rarity: Rarity,
    /// Event kinds this effect's handler subscribes to. May be empty for
    /// pure stat-rule effects.
    pub triggers: TriggerSet,
    pub behavior: BehaviorKind,
    pub params: EffectParams,
    /// Upper bound on accumulated stacks.
    pub max_stacks: u8,
    /// When set, stacks reset on battle boundaries instead of persisting
    /// for the run.
    pub battle_scoped_stacks: bool,
    /// When set, repeated percentage applications compound instead of
    /// applying against the current maximum.
    pub multiplicative_stacking: bool,
}

impl EffectDefinition {
    pub fn new(
        id: impl Into<EffectId>,
        name: impl Into<String>,
        behavior: BehaviorKind,
        cost: u32,
        triggers: TriggerSet,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            cost,
            unlock_price: 0,
            rarity: Rarity::Common,
            triggers,
            behavior,
            params: EffectParams::new(),
            max_stacks: 1,
            battle_scoped_stacks: false,
            multiplicative_stacking: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_unlock_price(mut self, price: u32) -> Self {
        self.unlock_price = price;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_params(mut self, params: EffectParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_max_stacks(mut self, max_stacks: u8) -> Self {
        self.max_stacks = max_stacks;
        self
    }

    pub fn with_battle_scoped_stacks(mut self) -> Self {
        self.battle_scoped_stacks = true;
        self
    }

    /// Whether the effect is selectable given the persisted unlock set.
    ///
    /// A zero price always wins: an effect whose price was raised after a
    /// player unlocked it stays available to them, and a price dropped to
    /// zero opens it to everyone.
    pub fn is_available(&self, unlocked: &BTreeSet<EffectId>) -> bool {
        self.unlock_price == 0 || unlocked.contains(&self.id)
    }
}

/// Immutable, ordered effect registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectCatalog {
    effects: BTreeMap<EffectId, EffectDefinition>,
}

impl EffectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions, validating each insert.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = EffectDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition)?;
        }
        Ok(catalog)
    }

    /// Register a definition. Rejects out-of-range costs and duplicates.
    pub fn insert(&mut self, definition: EffectDefinition) -> Result<(), CatalogError> {
        if !(EngineConfig::MIN_EFFECT_COST..=EngineConfig::MAX_EFFECT_COST)
            .contains(&definition.cost)
        {
            return Err(CatalogError::CostOutOfRange {
                id: definition.id.clone(),
                cost: definition.cost,
                min: EngineConfig::MIN_EFFECT_COST,
                max: EngineConfig::MAX_EFFECT_COST,
            });
        }
        if self.effects.contains_key(&definition.id) {
            return Err(CatalogError::DuplicateId(definition.id));
        }
        self.effects.insert(definition.id.clone(), definition);
        Ok(())
    }

    pub fn get(&self, id: &EffectId) -> Option<&EffectDefinition> {
        self.effects.get(id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.effects.values()
    }

    /// Definitions selectable given the persisted unlock set.
    pub fn list_available(&self, unlocked: &BTreeSet<EffectId>) -> Vec<&EffectDefinition> {
        self.iter()
            .filter(|definition| definition.is_available(unlocked))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TriggerKind;

    fn definition(id: &str, cost: u32, price: u32) -> EffectDefinition {
        EffectDefinition::new(
            id,
            id,
            BehaviorKind::Regeneration,
            cost,
            TriggerSet::from_kinds(&[TriggerKind::FieldTick]),
        )
        .with_unlock_price(price)
    }

    #[test]
    fn rejects_out_of_range_cost() {
        let mut catalog = EffectCatalog::new();
        let err = catalog.insert(definition("too_cheap", 0, 0)).unwrap_err();
        assert!(matches!(err, CatalogError::CostOutOfRange { cost: 0, .. }));
        let err = catalog.insert(definition("too_dear", 11, 0)).unwrap_err();
        assert!(matches!(err, CatalogError::CostOutOfRange { cost: 11, .. }));
    }

    #[test]
    fn rejects_duplicate_id() {
        let mut catalog = EffectCatalog::new();
        catalog.insert(definition("life_seed", 1, 0)).unwrap();
        let err = catalog.insert(definition("life_seed", 2, 0)).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(_)));
    }

    #[test]
    fn availability_is_price_or_unlock() {
        let catalog = EffectCatalog::from_definitions([
            definition("free", 1, 0),
            definition("locked", 1, 50),
            definition("owned", 1, 50),
        ])
        .unwrap();

        let unlocked = BTreeSet::from([EffectId::from("owned")]);
        let available = catalog.list_available(&unlocked);
        let ids: Vec<_> = available.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["free", "owned"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn definition_round_trips_through_serde() {
        let definition = definition("life_seed", 1, 40)
            .with_rarity(Rarity::Rare)
            .with_params(EffectParams::new().set_int("hp_regen_pct", 2).set_flag("loud", true))
            .with_max_stacks(3)
            .with_battle_scoped_stacks();

        let bytes = bincode::serialize(&definition).unwrap();
        let decoded: EffectDefinition = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, definition);
    }

    #[test]
    fn params_fall_back_to_defaults() {
        let params = EffectParams::new()
            .set_int("hp_regen_pct", 2)
            .set_flag("loud", true);
        assert_eq!(params.int("hp_regen_pct", 0), 2);
        assert_eq!(params.int("missing", 7), 7);
        assert!(params.flag("loud", false));
        assert_eq!(params.uint("hp_regen_pct", 0), 2);
    }
}
