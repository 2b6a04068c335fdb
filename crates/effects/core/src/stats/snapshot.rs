//! Ephemeral stat snapshot.

/// A character's effective stats at one point in time.
///
/// Produced by [`crate::stats::resolver::compute`] and consumed by the
/// combat orchestrator; never persisted, never mutated in place. If the
/// character's HP/MP or the state store changes, compute a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStatSnapshot {
    pub attack: i32,
    pub defense: i32,
    pub magic: i32,
    pub speed: i32,
    pub luck: i32,
    /// Effective critical-hit chance, percentage in [0, 100].
    pub crit_chance: i32,
    pub hp_max: u32,
    pub mp_max: u32,
    /// Current HP clamped to the effective maximum.
    pub hp: u32,
    /// Current MP clamped to the effective maximum.
    pub mp: u32,
}

impl CharacterStatSnapshot {
    /// HP as (current, maximum).
    pub fn hp(&self) -> (u32, u32) {
        (self.hp, self.hp_max)
    }

    /// MP as (current, maximum).
    pub fn mp(&self) -> (u32, u32) {
        (self.mp, self.mp_max)
    }
}
