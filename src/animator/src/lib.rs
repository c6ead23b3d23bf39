use std::{
    thread,
    time::{Duration, Instant},
};

pub mod config;
pub mod coordinator;
pub mod module;

pub use config::{ConfigError, HexpressionsConfig};
pub use coordinator::{
    Display, Position, RenderTarget, SlotPositions, TickOutcome, TurnAnimation, TurnCoordinator,
};
pub use module::{PuzzleHandle, PuzzleModule, SubmitOutcome, run_animation_loop};

/// Sleeps to absolute deadlines, so time spent between waits does not
/// accumulate as drift.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    deadline: Instant,
}

impl Ticker {
    pub fn new() -> Self {
        Self {
            deadline: Instant::now(),
        }
    }

    /// Measures the next wait from the current instant.
    pub fn restart(&mut self) {
        self.deadline = Instant::now();
    }

    pub fn wait(&mut self, delay: Duration) {
        self.deadline += delay;
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}
