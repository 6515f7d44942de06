//! Session tunables, difficulty presets, and level-scaling helpers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Numeric tunables applied when a session is configured.
///
/// All distances are world units, all speeds are world units per frame at the
/// nominal 60 Hz rate, and all timers are wall-clock durations of simulated
/// time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Side length of a square maze cell in world units.
    pub cell_size: f32,
    /// Probability that an eligible interior wall becomes unstable.
    pub unstable_wall_chance: f32,
    /// Base movement speed of the player.
    pub player_speed: f32,
    /// Collision radius of the player.
    pub player_radius: f32,
    /// Lives granted at the start of the session.
    pub lives: u32,
    /// Invulnerability window granted after losing a life.
    pub hit_grace: Duration,
    /// Number of pursuit agents spawned.
    pub agent_count: usize,
    /// Base movement speed of pursuer agents; other variants scale off it.
    pub agent_speed: f32,
    /// Collision radius of every agent.
    pub agent_radius: f32,
    /// Multiplier applied to every agent speed, raised by level scaling.
    pub speed_multiplier: f32,
    /// Minimum spawn distance between any agent and the player.
    pub agent_spawn_distance: f32,
    /// Interval between chase/scatter phase toggles.
    pub mode_interval: Duration,
    /// Length of the frightened window opened by capture-granting pickups.
    pub frightened_duration: Duration,
    /// Number of qubits placed in the maze.
    pub qubit_count: usize,
    /// Number of entangled qubit pairs among the placed qubits.
    pub entangled_pairs: usize,
    /// Length of the bonus window opened by collecting half of a pair.
    pub entanglement_window: Duration,
    /// Bonus points awarded for completing a pair within the window.
    pub entanglement_bonus: u32,
    /// Interval between power-up spawn attempts.
    pub powerup_spawn_interval: Duration,
    /// Maximum number of uncollected power-ups present at once.
    pub max_powerups: usize,
    /// Shared cooldown of the teleporter pair.
    pub teleport_cooldown: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            unstable_wall_chance: 0.15,
            player_speed: 3.0,
            player_radius: 12.0,
            lives: 3,
            hit_grace: Duration::from_secs(2),
            agent_count: 4,
            agent_speed: 1.5,
            agent_radius: 10.0,
            speed_multiplier: 1.0,
            agent_spawn_distance: 100.0,
            mode_interval: Duration::from_secs(10),
            frightened_duration: Duration::from_secs(5),
            qubit_count: 30,
            entangled_pairs: 2,
            entanglement_window: Duration::from_secs(10),
            entanglement_bonus: 100,
            powerup_spawn_interval: Duration::from_secs(15),
            max_powerups: 3,
            teleport_cooldown: Duration::from_secs(1),
        }
    }
}

impl Config {
    /// Builds the tunables for a one-based level under the given difficulty.
    #[must_use]
    pub fn for_level(level: u32, difficulty: Difficulty) -> Self {
        let mut config = Config::default();
        difficulty.apply(&mut config);
        config.agent_count = agent_count_for_level(level);
        config.qubit_count = qubit_count_for_level(level);
        config.speed_multiplier = speed_multiplier_for_level(level);
        config
    }
}

/// Preset bundles that bias the session toward a target challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Slow agents, generous power-up cadence and bonus window.
    Easy,
    /// Baseline tuning.
    Normal,
    /// Faster agents, sparser power-ups, shorter bonus window.
    Hard,
    /// Fastest agents and the tightest bonus window.
    Quantum,
}

impl Difficulty {
    /// Overwrites the difficulty-sensitive fields of the provided config.
    pub fn apply(self, config: &mut Config) {
        let (agent_speed, spawn_secs, window_secs) = match self {
            Difficulty::Easy => (1.2, 12, 15),
            Difficulty::Normal => (1.5, 15, 10),
            Difficulty::Hard => (1.8, 20, 7),
            Difficulty::Quantum => (2.0, 25, 5),
        };
        config.agent_speed = agent_speed;
        config.powerup_spawn_interval = Duration::from_secs(spawn_secs);
        config.entanglement_window = Duration::from_secs(window_secs);
    }
}

/// Number of agents fielded on a one-based level, capped at six.
#[must_use]
pub fn agent_count_for_level(level: u32) -> usize {
    let level = level.max(1);
    usize::try_from((2 + level).min(6)).unwrap_or(6)
}

/// Number of qubits placed on a one-based level, capped at fifty.
#[must_use]
pub fn qubit_count_for_level(level: u32) -> usize {
    let level = level.max(1);
    usize::try_from((30 + 5 * (level - 1)).min(50)).unwrap_or(50)
}

/// Agent speed multiplier applied on a one-based level, capped at 1.5.
#[must_use]
pub fn speed_multiplier_for_level(level: u32) -> f32 {
    let level = level.max(1);
    (1.0 + 0.05 * (level - 1) as f32).min(1.5)
}
