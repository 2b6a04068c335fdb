/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Maximum total cost of the effects selected for a run.
    pub budget_cap: u32,
    /// Maximum number of effects in a loadout. Never exceeds
    /// [`EngineConfig::MAX_LOADOUT`].
    pub max_effect_count: usize,
    /// Number of field movement steps between two `FieldTick` events.
    pub field_tick_period: u32,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Hard upper bound on loadout size; backs the loadout's ArrayVec.
    pub const MAX_LOADOUT: usize = 3;

    // ===== catalog validation bounds =====
    pub const MIN_EFFECT_COST: u32 = 1;
    pub const MAX_EFFECT_COST: u32 = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BUDGET_CAP: u32 = 5;
    pub const DEFAULT_FIELD_TICK_PERIOD: u32 = 20;

    pub fn new() -> Self {
        Self {
            budget_cap: Self::DEFAULT_BUDGET_CAP,
            max_effect_count: Self::MAX_LOADOUT,
            field_tick_period: Self::DEFAULT_FIELD_TICK_PERIOD,
        }
    }

    pub fn with_budget_cap(budget_cap: u32) -> Self {
        Self {
            budget_cap,
            ..Self::new()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
