#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that paces power-up placement.
//!
//! The system accumulates elapsed time from the event stream and emits
//! [`Command::SpawnPowerUp`] whenever a full spawn interval has passed and
//! the on-screen cap leaves room. The world remains the authority: it still
//! validates the target cell before placing anything.

use std::time::Duration;

use quantum_maze_core::{CellCoord, Command, Event, PowerUpKind};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tunables consumed by [`Spawning`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Interval between spawn attempts.
    pub spawn_interval: Duration,
    /// Maximum number of uncollected power-ups allowed on screen.
    pub max_active: usize,
    /// Seed for the system's own random number generator.
    pub rng_seed: u64,
}

impl Config {
    /// Creates a configuration with the standard cadence and the given seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, max_active: usize, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            max_active,
            rng_seed,
        }
    }
}

/// Stateful spawn scheduler.
pub struct Spawning {
    config: Config,
    rng: ChaCha8Rng,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a spawning system seeded from the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            accumulator: Duration::ZERO,
        }
    }

    /// Reacts to one batch of world events. `path_cells` are the candidate
    /// placement cells and `active_power_ups` is the current uncollected
    /// count reported by the world.
    pub fn handle(
        &mut self,
        events: &[Event],
        path_cells: &[CellCoord],
        active_power_ups: usize,
        out_commands: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::SessionConfigured { .. } => self.accumulator = Duration::ZERO,
                Event::TimeAdvanced { dt } => self.accumulator += *dt,
                _ => {}
            }
        }
        if self.config.spawn_interval.is_zero() || path_cells.is_empty() {
            return;
        }

        let mut pending = 0;
        while self.accumulator >= self.config.spawn_interval {
            self.accumulator -= self.config.spawn_interval;
            if active_power_ups + pending >= self.config.max_active {
                continue;
            }
            let Some(cell) = path_cells.choose(&mut self.rng) else {
                continue;
            };
            let Some(kind) = PowerUpKind::ALL.choose(&mut self.rng) else {
                continue;
            };
            out_commands.push(Command::SpawnPowerUp {
                cell: *cell,
                kind: *kind,
            });
            pending += 1;
        }
    }
}
