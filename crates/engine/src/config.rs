//! Configuration for the engine runtime

use std::time::Duration;

use crate::types::HARD_DROP_LOCK_DELAY_MS;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Seed for the piece randomizer
    pub seed: u32,

    /// Cosmetic pause between a hard drop landing and its lock.
    /// Zero locks inline.
    pub hard_drop_lock_delay: Duration,

    /// Capacity of the command queue shared by input, gravity and deferred locks
    pub command_capacity: usize,

    /// Capacity of the event broadcast; slow subscribers beyond this lag
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            hard_drop_lock_delay: Duration::from_millis(HARD_DROP_LOCK_DELAY_MS as u64),
            command_capacity: 64,
            event_capacity: 32,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    ///
    /// - `NEON_TETRIS_SEED`: piece randomizer seed
    /// - `NEON_TETRIS_HARD_DROP_DELAY_MS`: hard drop lock delay in milliseconds
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let seed = env::var("NEON_TETRIS_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        let hard_drop_lock_delay = env::var("NEON_TETRIS_HARD_DROP_DELAY_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.hard_drop_lock_delay);

        Self {
            seed,
            hard_drop_lock_delay,
            ..defaults
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_hard_drop_lock_delay(mut self, delay: Duration) -> Self {
        self.hard_drop_lock_delay = delay;
        self
    }
}
