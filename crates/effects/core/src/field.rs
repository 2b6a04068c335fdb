//! Field step accounting.
//!
//! The tick scheduler is an accumulator, not a timer: every player
//! movement increments the step counter, and a `FieldTick` fires whenever
//! the running count crosses a multiple of the period. The counter is
//! never reset on fire, so tick phase survives floor transitions.

use crate::event::TriggerEvent;

/// Accumulating movement counter that emits periodic field ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepCounter {
    steps: u32,
    period: u32,
}

impl StepCounter {
    pub fn new(period: u32) -> Self {
        Self {
            steps: 0,
            // A zero period would never fire; treat it as every step.
            period: period.max(1),
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Record one movement step. Returns the `FieldTick` event when the
    /// counter lands on a period multiple.
    pub fn advance(&mut self, floor_id: u32) -> Option<TriggerEvent> {
        self.steps = self.steps.wrapping_add(1);
        if self.steps % self.period == 0 {
            Some(TriggerEvent::FieldTick {
                step_count: self.steps,
                floor_id,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_on_period_multiples() {
        let mut counter = StepCounter::new(20);
        for step in 1..20 {
            assert!(counter.advance(1).is_none(), "fired early at step {step}");
        }
        assert_eq!(
            counter.advance(1),
            Some(TriggerEvent::FieldTick {
                step_count: 20,
                floor_id: 1
            })
        );
    }

    #[test]
    fn phase_survives_floor_transitions() {
        let mut counter = StepCounter::new(20);
        for _ in 0..15 {
            counter.advance(1);
        }
        // Floor changes; the accumulated 15 steps still count.
        for _ in 0..4 {
            assert!(counter.advance(2).is_none());
        }
        assert_eq!(
            counter.advance(2),
            Some(TriggerEvent::FieldTick {
                step_count: 20,
                floor_id: 2
            })
        );
    }
}
