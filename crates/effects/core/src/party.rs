//! Party roster view consumed by the engine.
//!
//! The engine reads base stats and meters, and mutates exactly two
//! surfaces on a character: the HP/MP meters (heals, damage, restores)
//! and the temporary boost list. The `tags` map is the host's channel
//! for per-character counters the engine may read; it is always present,
//! so readers never probe for optional fields.

use std::collections::BTreeMap;

use crate::stats::{Bonus, StatKind};

/// Identifies a party member. Stable for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterId(pub u32);

impl CharacterId {
    /// The party leader occupies slot 0 by convention.
    pub const LEADER: CharacterId = CharacterId(0);
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "char#{}", self.0)
    }
}

/// A depletable resource pool (HP or MP) with clamped arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    current: u32,
    maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Restore up to `amount`, saturating at the maximum.
    pub fn restore(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.maximum);
    }

    /// Remove up to `amount`, saturating at zero.
    pub fn deplete(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Integer percentage of the maximum, e.g. `percent_of_max(2)` on a
    /// 100-point meter is 2. Computed against the *current* maximum so
    /// repeated applications never compound.
    pub fn percent_of_max(&self, percent: u32) -> u32 {
        (self.maximum * percent) / 100
    }

    /// Whether `current / maximum <= percent / 100`, in integer math.
    pub fn at_or_below_percent(&self, percent: u32) -> bool {
        self.current * 100 <= self.maximum * percent
    }
}

/// Base combat stats stored on a character (before any contribution).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub attack: i32,
    pub defense: i32,
    pub magic: i32,
    pub speed: i32,
    pub luck: i32,
    /// Base critical-hit chance as an integer percentage.
    pub crit_chance: i32,
}

/// A single stat contribution from equipment, a temporary boost, or an
/// active effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatContribution {
    pub stat: StatKind,
    pub bonus: Bonus,
}

impl StatContribution {
    pub fn new(stat: StatKind, bonus: Bonus) -> Self {
        Self { stat, bonus }
    }
}

/// One party member as seen by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterState {
    pub id: CharacterId,
    pub name: String,
    pub base: BaseStats,
    pub hp: ResourceMeter,
    pub mp: ResourceMeter,
    /// Contributions from equipped items, in equip order.
    pub equipment: Vec<StatContribution>,
    /// Temporary boosts granted during a battle; cleared when the battle
    /// ends.
    pub boosts: Vec<StatContribution>,
    /// Host-written counters keyed by name (quest flags, trial
    /// modifiers). Always present; a missing key reads as zero, so
    /// readers never probe for optional fields. Built-in behaviors keep
    /// their own counters in the state store and leave this map to the
    /// host.
    pub tags: BTreeMap<String, i64>,
}

impl CharacterState {
    pub fn new(id: CharacterId, name: impl Into<String>, base: BaseStats, hp: u32, mp: u32) -> Self {
        Self {
            id,
            name: name.into(),
            base,
            hp: ResourceMeter::full(hp),
            mp: ResourceMeter::full(mp),
            equipment: Vec::new(),
            boosts: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_depleted()
    }

    pub fn tag(&self, name: &str) -> i64 {
        self.tags.get(name).copied().unwrap_or(0)
    }

    pub fn set_tag(&mut self, name: impl Into<String>, value: i64) {
        self.tags.insert(name.into(), value);
    }
}

/// The active party roster for a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Party {
    members: Vec<CharacterState>,
}

impl Party {
    pub fn new(members: Vec<CharacterState>) -> Self {
        Self { members }
    }

    pub fn member(&self, id: CharacterId) -> Option<&CharacterState> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn member_mut(&mut self, id: CharacterId) -> Option<&mut CharacterState> {
        self.members.iter_mut().find(|member| member.id == id)
    }

    pub fn members(&self) -> &[CharacterState] {
        &self.members
    }

    pub fn ids(&self) -> Vec<CharacterId> {
        self.members.iter().map(|member| member.id).collect()
    }

    /// Drop all temporary boosts, e.g. at the end of a battle.
    pub fn clear_boosts(&mut self) {
        for member in &mut self.members {
            member.boosts.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_clamps_on_both_ends() {
        let mut meter = ResourceMeter::new(50, 100);
        meter.restore(200);
        assert_eq!(meter.current(), 100);
        meter.deplete(250);
        assert_eq!(meter.current(), 0);
        assert!(meter.is_depleted());
    }

    #[test]
    fn percent_of_max_uses_current_maximum() {
        let meter = ResourceMeter::new(50, 100);
        assert_eq!(meter.percent_of_max(2), 2);
        assert_eq!(meter.percent_of_max(15), 15);
    }

    #[test]
    fn threshold_check_is_inclusive() {
        let meter = ResourceMeter::new(15, 100);
        assert!(meter.at_or_below_percent(15));
        let meter = ResourceMeter::new(16, 100);
        assert!(!meter.at_or_below_percent(15));
    }

    #[test]
    fn missing_tag_reads_as_zero() {
        let member = CharacterState::new(CharacterId(1), "ana", BaseStats::default(), 100, 20);
        assert_eq!(member.tag("combo"), 0);
    }
}
