#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that paces an active walk.
//!
//! The world moves the token one cell per [`Command::AdvanceWalk`]; this system
//! decides when those commands are due by accumulating elapsed time and
//! releasing one step per [`STEP_INTERVAL`].

use std::time::Duration;

use grid_explorer_core::{Command, Event, STEP_INTERVAL};
use tracing::trace;

/// Pure system that reacts to world events and emits walk steps.
#[derive(Debug)]
pub struct Movement {
    interval: Duration,
    remaining: usize,
    accumulated: Duration,
}

impl Movement {
    /// Creates a movement system stepping at the provided interval.
    ///
    /// A zero interval is replaced by [`STEP_INTERVAL`].
    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            STEP_INTERVAL
        } else {
            interval
        };
        Self {
            interval,
            remaining: 0,
            accumulated: Duration::ZERO,
        }
    }

    /// Consumes world events in order and emits the walk steps that fell due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::WalkStarted { steps, .. } => {
                    self.remaining = *steps;
                    self.accumulated = Duration::ZERO;
                }
                Event::WalkCompleted { .. } | Event::SessionDisposed => self.disarm(),
                Event::TimeAdvanced { dt } => self.accumulate(*dt, out),
                _ => {}
            }
        }
    }

    /// Steps still owed to the active walk.
    #[must_use]
    pub fn remaining_steps(&self) -> usize {
        self.remaining
    }

    /// Reports whether a walk is currently being paced.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.remaining > 0
    }

    fn accumulate(&mut self, dt: Duration, out: &mut Vec<Command>) {
        if !self.is_armed() {
            return;
        }

        self.accumulated = self.accumulated.saturating_add(dt);
        while self.remaining > 0 && self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            self.remaining -= 1;
            out.push(Command::AdvanceWalk);
        }

        if self.remaining == 0 {
            self.accumulated = Duration::ZERO;
        }
        trace!(
            remaining = self.remaining,
            carry_ms = self.accumulated.as_millis() as u64,
            "walk cadence"
        );
    }

    fn disarm(&mut self) {
        self.remaining = 0;
        self.accumulated = Duration::ZERO;
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::with_interval(STEP_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_explorer_core::CellId;

    fn started(steps: usize) -> Event {
        Event::WalkStarted {
            steps,
            collect: None,
        }
    }

    fn elapsed(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    #[test]
    fn idle_driver_ignores_time() {
        let mut movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(&[elapsed(5_000)], &mut out);

        assert!(out.is_empty());
        assert!(!movement.is_armed());
    }

    #[test]
    fn partial_intervals_carry_over() {
        let mut movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(&[started(3), elapsed(200)], &mut out);
        assert!(out.is_empty());

        movement.handle(&[elapsed(200)], &mut out);
        assert_eq!(out, vec![Command::AdvanceWalk]);
        assert_eq!(movement.remaining_steps(), 2);
    }

    #[test]
    fn long_frame_never_exceeds_remaining_steps() {
        let mut movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(&[started(2), elapsed(10_000)], &mut out);

        assert_eq!(out, vec![Command::AdvanceWalk, Command::AdvanceWalk]);
        assert!(!movement.is_armed());
    }

    #[test]
    fn new_walk_resets_the_timer() {
        let mut movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(&[started(4), elapsed(250), started(4), elapsed(100)], &mut out);

        assert!(out.is_empty());
        assert_eq!(movement.remaining_steps(), 4);
    }

    #[test]
    fn completion_and_disposal_disarm() {
        let mut movement = Movement::default();
        let mut out = Vec::new();

        movement.handle(
            &[
                started(5),
                Event::WalkCompleted {
                    cell: CellId::new(0),
                },
                elapsed(900),
            ],
            &mut out,
        );
        assert!(out.is_empty());

        movement.handle(&[started(5), Event::SessionDisposed, elapsed(900)], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn zero_interval_falls_back_to_default_cadence() {
        let mut movement = Movement::with_interval(Duration::ZERO);
        let mut out = Vec::new();

        movement.handle(&[started(3), elapsed(299)], &mut out);
        assert!(out.is_empty());

        movement.handle(&[elapsed(1)], &mut out);
        assert_eq!(out.len(), 1);
    }
}
