//! Bonus application stack.
//!
//! Every stat computation folds its contributions in the same order:
//! `Flat → %Inc → More → Less → Clamp`. Percentage increases are summed
//! before multiplying, so two +10% contributions yield +20%, not +21%.
//! Percentage effects apply against the current base and never compound
//! unless a definition opts into `More` multipliers.

/// A single bonus contribution to a stat value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Flat additive bonus, applied first.
    Flat(i32),
    /// Percentage increase; summed with other `Increased`, then
    /// multiplied once. Stored as an integer percentage (20 = +20%).
    Increased(i32),
    /// Multiplicative "more" modifier, applied sequentially (50 = ×1.5).
    More(i32),
    /// Multiplicative "less" modifier, applied sequentially (10 = ×0.9).
    Less(i32),
}

impl Bonus {
    pub fn flat(value: i32) -> Self {
        Bonus::Flat(value)
    }

    pub fn increased(percent: i32) -> Self {
        Bonus::Increased(percent)
    }

    pub fn more(percent: i32) -> Self {
        Bonus::More(percent)
    }

    pub fn less(percent: i32) -> Self {
        Bonus::Less(percent)
    }
}

/// Ordered collection of bonuses applied with the standard fold.
///
/// Insertion order is preserved and meaningful for the sequential
/// multiplier steps; the stat resolver inserts contributions in loadout
/// order so same-category stacking is independent of event arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn extend(&mut self, bonuses: impl IntoIterator<Item = Bonus>) {
        self.bonuses.extend(bonuses);
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    /// Fold all bonuses over `base` and clamp the result.
    ///
    /// `result = clamp((base + Σflat) × (1 + Σinc/100) × Πmore × Πless, min, max)`
    pub fn apply(&self, base: i32, bounds: StatBounds) -> i32 {
        let flat_sum: i32 = self
            .bonuses
            .iter()
            .filter_map(|bonus| match bonus {
                Bonus::Flat(value) => Some(*value),
                _ => None,
            })
            .sum();

        let inc_sum: i32 = self
            .bonuses
            .iter()
            .filter_map(|bonus| match bonus {
                Bonus::Increased(percent) => Some(*percent),
                _ => None,
            })
            .sum();

        let after_inc = if inc_sum == 0 {
            base + flat_sum
        } else {
            ((base + flat_sum) * (100 + inc_sum)) / 100
        };

        let after_more = self
            .bonuses
            .iter()
            .filter_map(|bonus| match bonus {
                Bonus::More(percent) => Some(*percent),
                _ => None,
            })
            .fold(after_inc, |acc, percent| (acc * (100 + percent)) / 100);

        let after_less = self
            .bonuses
            .iter()
            .filter_map(|bonus| match bonus {
                Bonus::Less(percent) => Some(*percent),
                _ => None,
            })
            .fold(after_more, |acc, percent| (acc * (100 - percent)) / 100);

        after_less.clamp(bounds.min, bounds.max)
    }
}

/// Clamping bounds for a stat family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    /// Combat stats (attack, defense, magic, speed, luck) [0, 9999].
    pub const COMBAT: Self = Self { min: 0, max: 9999 };

    /// Critical-hit chance is a percentage [0, 100].
    pub const CRIT_CHANCE: Self = Self { min: 0, max: 100 };

    /// Resource maximums [1, 99999]; a zero maximum would brick a meter.
    pub const RESOURCE_MAX: Self = Self { min: 1, max: 99999 };
}
