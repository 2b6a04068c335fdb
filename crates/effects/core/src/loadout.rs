//! Budget-limited effect selection and the unlock economy boundary.
//!
//! Selection is all-or-nothing: either every candidate passes validation
//! and an [`ActiveLoadout`] is produced, or the first violation is
//! returned and nothing changes. The loadout's order is the selection
//! order and is the canonical iteration order for dispatch and stat
//! resolution.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::catalog::{EffectCatalog, EffectDefinition, EffectId};
use crate::config::EngineConfig;
use crate::error::SelectionError;

/// The effects chosen for the current run, in selection order.
///
/// Invariants (enforced by [`select`]): no duplicate ids,
/// `len <= max_effect_count`, `Σ cost <= budget_cap`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveLoadout {
    effects: ArrayVec<EffectDefinition, { EngineConfig::MAX_LOADOUT }>,
}

/// One row of the UI-facing active-effect listing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadoutEntry {
    pub id: EffectId,
    pub cost: u32,
    pub description: String,
}

impl ActiveLoadout {
    pub fn iter(&self) -> impl Iterator<Item = &EffectDefinition> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn total_cost(&self) -> u32 {
        self.effects.iter().map(|definition| definition.cost).sum()
    }

    pub fn contains(&self, id: &EffectId) -> bool {
        self.effects.iter().any(|definition| &definition.id == id)
    }

    pub fn get(&self, id: &EffectId) -> Option<&EffectDefinition> {
        self.effects.iter().find(|definition| &definition.id == id)
    }

    /// UI rows for the active effects, in loadout order.
    pub fn entries(&self) -> Vec<LoadoutEntry> {
        self.effects
            .iter()
            .map(|definition| LoadoutEntry {
                id: definition.id.clone(),
                cost: definition.cost,
                description: definition.description.clone(),
            })
            .collect()
    }
}

/// Validate candidates against the catalog and budget rules.
///
/// Candidates are checked in order; the first violation aborts the whole
/// selection (no partial loadouts).
pub fn select(
    catalog: &EffectCatalog,
    candidate_ids: &[EffectId],
    budget_cap: u32,
    max_count: usize,
) -> Result<ActiveLoadout, SelectionError> {
    let max_count = max_count.min(EngineConfig::MAX_LOADOUT);
    if candidate_ids.len() > max_count {
        return Err(SelectionError::TooManyEffects {
            count: candidate_ids.len(),
            max_count,
        });
    }

    let mut seen: BTreeSet<&EffectId> = BTreeSet::new();
    let mut effects = ArrayVec::new();
    for id in candidate_ids {
        if !seen.insert(id) {
            return Err(SelectionError::Duplicate(id.clone()));
        }
        let definition = catalog
            .get(id)
            .ok_or_else(|| SelectionError::UnknownId(id.clone()))?;
        effects.push(definition.clone());
    }

    let loadout = ActiveLoadout { effects };
    let cost = loadout.total_cost();
    if cost > budget_cap {
        return Err(SelectionError::OverBudget {
            cost,
            budget_cap,
        });
    }
    Ok(loadout)
}

/// Unlock currency and persisted unlock set, owned by the meta-progression
/// collaborator. The engine only reads the balance and unlocked ids, and
/// spends through this trait.
pub trait EconomyOracle {
    fn balance(&self) -> u32;
    fn is_unlocked(&self, id: &EffectId) -> bool;
    fn unlocked(&self) -> BTreeSet<EffectId>;
    /// Deduct `amount`; implementations must leave the balance untouched
    /// on failure.
    fn spend(&mut self, amount: u32) -> Result<(), SelectionError>;
    fn grant(&mut self, id: EffectId);
}

/// Unlock an effect, atomically spending its price.
///
/// Both the price check and the spend happen before the grant, so a
/// failure leaves the balance and the unlocked set unchanged. Unlocking
/// an already-unlocked or price-zero effect succeeds without spending.
pub fn unlock(
    catalog: &EffectCatalog,
    id: &EffectId,
    economy: &mut dyn EconomyOracle,
) -> Result<(), SelectionError> {
    let definition = catalog
        .get(id)
        .ok_or_else(|| SelectionError::UnknownId(id.clone()))?;

    if definition.unlock_price == 0 || economy.is_unlocked(id) {
        return Ok(());
    }
    if economy.balance() < definition.unlock_price {
        return Err(SelectionError::InsufficientCurrency {
            price: definition.unlock_price,
            balance: economy.balance(),
        });
    }
    economy.spend(definition.unlock_price)?;
    economy.grant(id.clone());
    Ok(())
}

/// In-memory economy, used by tests and offline tools.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerEconomy {
    balance: u32,
    unlocked: BTreeSet<EffectId>,
}

impl LedgerEconomy {
    pub fn with_balance(balance: u32) -> Self {
        Self {
            balance,
            unlocked: BTreeSet::new(),
        }
    }
}

impl EconomyOracle for LedgerEconomy {
    fn balance(&self) -> u32 {
        self.balance
    }

    fn is_unlocked(&self, id: &EffectId) -> bool {
        self.unlocked.contains(id)
    }

    fn unlocked(&self) -> BTreeSet<EffectId> {
        self.unlocked.clone()
    }

    fn spend(&mut self, amount: u32) -> Result<(), SelectionError> {
        if self.balance < amount {
            return Err(SelectionError::InsufficientCurrency {
                price: amount,
                balance: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    fn grant(&mut self, id: EffectId) {
        self.unlocked.insert(id);
    }
}
