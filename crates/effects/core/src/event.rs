//! Trigger events fed into the engine by external collaborators.
//!
//! The event set is closed: the field step counter, the combat
//! orchestrator, and the party roster emit exactly these kinds. Each
//! event carries the minimal payload its handlers need; everything else
//! (full combat state, dungeon layout) stays outside the engine boundary.

use bitflags::bitflags;

use crate::party::CharacterId;

/// The kind of a [`TriggerEvent`], used for handler subscription.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TriggerKind {
    /// Periodic field movement tick (every N steps).
    FieldTick,
    /// A battle is about to begin.
    BattleStart,
    /// A battle just ended.
    BattleEnd,
    /// A party member took damage.
    DamageTaken,
    /// An enemy was defeated.
    EnemyDefeated,
    /// A party member died.
    AllyDied,
    /// A party member used a skill.
    SkillUsed,
    /// A status effect landed on a party member.
    StatusApplied,
}

bitflags! {
    /// Set of trigger kinds an effect subscribes to.
    ///
    /// Stored on [`crate::catalog::EffectDefinition`] and checked on every
    /// dispatch; O(1) membership with a one-byte footprint.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TriggerSet: u8 {
        const FIELD_TICK     = 1 << 0;
        const BATTLE_START   = 1 << 1;
        const BATTLE_END     = 1 << 2;
        const DAMAGE_TAKEN   = 1 << 3;
        const ENEMY_DEFEATED = 1 << 4;
        const ALLY_DIED      = 1 << 5;
        const SKILL_USED     = 1 << 6;
        const STATUS_APPLIED = 1 << 7;
    }
}

impl TriggerKind {
    /// All kinds, in subscription-bit order.
    pub const ALL: [TriggerKind; 8] = [
        TriggerKind::FieldTick,
        TriggerKind::BattleStart,
        TriggerKind::BattleEnd,
        TriggerKind::DamageTaken,
        TriggerKind::EnemyDefeated,
        TriggerKind::AllyDied,
        TriggerKind::SkillUsed,
        TriggerKind::StatusApplied,
    ];

    /// The subscription bit for this kind.
    pub fn as_flag(self) -> TriggerSet {
        match self {
            TriggerKind::FieldTick => TriggerSet::FIELD_TICK,
            TriggerKind::BattleStart => TriggerSet::BATTLE_START,
            TriggerKind::BattleEnd => TriggerSet::BATTLE_END,
            TriggerKind::DamageTaken => TriggerSet::DAMAGE_TAKEN,
            TriggerKind::EnemyDefeated => TriggerSet::ENEMY_DEFEATED,
            TriggerKind::AllyDied => TriggerSet::ALLY_DIED,
            TriggerKind::SkillUsed => TriggerSet::SKILL_USED,
            TriggerKind::StatusApplied => TriggerSet::STATUS_APPLIED,
        }
    }
}

impl TriggerSet {
    /// Build a set from a list of kinds.
    pub fn from_kinds(kinds: &[TriggerKind]) -> Self {
        kinds
            .iter()
            .fold(TriggerSet::empty(), |set, kind| set | kind.as_flag())
    }

    /// Whether this set subscribes to the given kind.
    pub fn contains_kind(self, kind: TriggerKind) -> bool {
        self.contains(kind.as_flag())
    }

    /// The subscribed kinds, in bit order.
    pub fn kinds(self) -> impl Iterator<Item = TriggerKind> {
        TriggerKind::ALL
            .into_iter()
            .filter(move |kind| self.contains_kind(*kind))
    }
}

// bitflags does not derive serde for user flag types; serialize the set
// as its snake_case kind list so RON catalogs stay readable.
#[cfg(feature = "serde")]
mod serde_impls {
    use serde::de::Error as _;

    use super::{TriggerKind, TriggerSet};

    impl serde::Serialize for TriggerSet {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            // Materialize the names so length-prefixed formats (bincode)
            // receive an exact sequence length; `kinds()` is a filter and
            // cannot report one.
            let names: Vec<String> = self.kinds().map(|kind| kind.to_string()).collect();
            names.serialize(serializer)
        }
    }

    impl<'de> serde::Deserialize<'de> for TriggerSet {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let names = Vec::<String>::deserialize(deserializer)?;
            let mut kinds = Vec::with_capacity(names.len());
            for name in &names {
                let kind: TriggerKind = name
                    .parse()
                    .map_err(|_| D::Error::custom(format_args!("unknown trigger kind: {name}")))?;
                kinds.push(kind);
            }
            Ok(TriggerSet::from_kinds(&kinds))
        }
    }
}

/// How a battle concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Escaped,
}

/// A discrete trigger delivered to [`crate::dispatch::TriggerDispatcher`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEvent {
    FieldTick {
        step_count: u32,
        floor_id: u32,
    },
    BattleStart {
        party: Vec<CharacterId>,
        enemies: Vec<String>,
    },
    BattleEnd {
        outcome: BattleOutcome,
    },
    DamageTaken {
        defender: CharacterId,
        attacker: Option<CharacterId>,
        amount: u32,
        is_critical: bool,
    },
    EnemyDefeated {
        enemy: String,
        victor: CharacterId,
    },
    AllyDied {
        character: CharacterId,
    },
    SkillUsed {
        caster: CharacterId,
        skill_id: String,
    },
    StatusApplied {
        target: CharacterId,
        status_id: String,
    },
}

impl TriggerEvent {
    pub fn kind(&self) -> TriggerKind {
        match self {
            TriggerEvent::FieldTick { .. } => TriggerKind::FieldTick,
            TriggerEvent::BattleStart { .. } => TriggerKind::BattleStart,
            TriggerEvent::BattleEnd { .. } => TriggerKind::BattleEnd,
            TriggerEvent::DamageTaken { .. } => TriggerKind::DamageTaken,
            TriggerEvent::EnemyDefeated { .. } => TriggerKind::EnemyDefeated,
            TriggerEvent::AllyDied { .. } => TriggerKind::AllyDied,
            TriggerEvent::SkillUsed { .. } => TriggerKind::SkillUsed,
            TriggerEvent::StatusApplied { .. } => TriggerKind::StatusApplied,
        }
    }
}
