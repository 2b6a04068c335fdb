//! Handler registry.
//!
//! Built once from the loadout at creation time: a flat
//! `(trigger kind, effect id) → handler` map replaces per-trigger
//! conditional ladders. Dispatch is then lookup-and-iterate, and every
//! handler stays independently unit-testable.

use std::collections::BTreeMap;

use crate::catalog::{BehaviorKind, EffectId};
use crate::dispatch::handlers::{self, EffectHandler};
use crate::event::TriggerKind;
use crate::loadout::ActiveLoadout;

/// `(trigger kind, effect id) → handler`, fixed for the run.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<(TriggerKind, EffectId), EffectHandler>,
}

impl HandlerRegistry {
    /// Register the handler of every loadout effect under each kind in
    /// its trigger set. Pure stat-rule behaviors have no handler and
    /// claim no entries.
    pub fn build(loadout: &ActiveLoadout) -> Self {
        let mut handlers = BTreeMap::new();
        for definition in loadout.iter() {
            let Some(handler) = handler_for(definition.behavior) else {
                continue;
            };
            for kind in definition.triggers.kinds() {
                handlers.insert((kind, definition.id.clone()), handler);
            }
        }
        Self { handlers }
    }

    pub fn get(&self, kind: TriggerKind, id: &EffectId) -> Option<EffectHandler> {
        self.handlers.get(&(kind, id.clone())).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// The one handler implementing each behavior family.
fn handler_for(behavior: BehaviorKind) -> Option<EffectHandler> {
    match behavior {
        BehaviorKind::Regeneration => Some(handlers::regeneration),
        BehaviorKind::EmergencyHeal => Some(handlers::emergency_heal),
        BehaviorKind::ComboMomentum => Some(handlers::combo_momentum),
        BehaviorKind::VictorySpoils => Some(handlers::victors_spoils),
        BehaviorKind::AvengersOath => Some(handlers::avengers_oath),
        BehaviorKind::MindSiphon => Some(handlers::mind_siphon),
        BehaviorKind::IronResolve => Some(handlers::iron_resolve),
        BehaviorKind::SecondWind => Some(handlers::second_wind),
        // Pure conditional stat rule; resolved in stats::conditions.
        BehaviorKind::LuckyNumber => None,
    }
}
