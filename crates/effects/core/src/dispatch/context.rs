//! Explicit dispatch context.
//!
//! Everything a dispatch call may touch is bundled here and passed in:
//! the party roster, the state store, and the randomness source. There is
//! no ambient game object for handlers to reach into, which keeps
//! `dispatch` a function of its explicit inputs.

use crate::dispatch::rng::RngOracle;
use crate::party::Party;
use crate::state::EffectStateStore;

/// Mutable collaborators for one dispatch call.
pub struct DispatchContext<'a> {
    pub party: &'a mut Party,
    pub store: &'a mut EffectStateStore,
    pub rng: &'a dyn RngOracle,
    /// Seed for this dispatch, derived from the run seed and the event
    /// nonce by the caller.
    pub seed: u64,
}

impl<'a> DispatchContext<'a> {
    pub fn new(
        party: &'a mut Party,
        store: &'a mut EffectStateStore,
        rng: &'a dyn RngOracle,
        seed: u64,
    ) -> Self {
        Self {
            party,
            store,
            rng,
            seed,
        }
    }
}
