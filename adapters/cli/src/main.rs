#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for Quantum Maze sessions.
//!
//! Parses the session parameters, seeds the world and both systems, then
//! pumps the fixed-step loop: tick the world, hand the resulting events to
//! the steering and spawning systems, and apply the command batches they
//! answer with. A small autopilot supplies player intents so a full session
//! plays out without input hardware. Events are translated to log lines at
//! the point where a graphical front end would hook rendering and audio.

use std::time::Duration;

use anyhow::ensure;
use clap::Parser;
use glam::Vec2;
use quantum_maze_core::{Command, Config, Difficulty, Event};
use quantum_maze_system_agents::{Config as SteeringConfig, Steering};
use quantum_maze_system_spawning::{Config as SpawningConfig, Spawning};
use quantum_maze_world::{apply, query, World};

const STEERING_SEED_SALT: u64 = 0x5bd1_e995_9d1b_3c6a;
const SPAWNING_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Parser)]
#[command(name = "quantum-maze", about = "Headless Quantum Maze session driver")]
struct Args {
    /// Maze width in cells.
    #[arg(long, default_value_t = 40)]
    columns: u32,

    /// Maze height in cells.
    #[arg(long, default_value_t = 30)]
    rows: u32,

    /// One-based level used for entity-count and speed scaling.
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Difficulty preset.
    #[arg(long, value_enum, default_value = "normal")]
    difficulty: DifficultyArg,

    /// Seed shared by the world and the systems; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of fixed-length ticks to simulate.
    #[arg(long, default_value_t = 3600)]
    ticks: u32,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Log every event, including the per-tick bookkeeping ones.
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
    Quantum,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
            DifficultyArg::Quantum => Difficulty::Quantum,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    ensure!(args.tick_ms > 0, "tick duration must be positive");

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = Config::for_level(args.level, args.difficulty.into());
    println!("seed {seed}");

    let mut world = World::new();
    let mut steering = Steering::new(SteeringConfig::new(seed ^ STEERING_SEED_SALT));
    let mut spawning = Spawning::new(SpawningConfig::new(
        config.powerup_spawn_interval,
        config.max_powerups,
        seed ^ SPAWNING_SEED_SALT,
    ));

    let mut events = Vec::new();
    let mut commands = Vec::new();
    apply(
        &mut world,
        Command::ConfigureSession {
            columns: args.columns,
            rows: args.rows,
            config,
            seed,
        },
        &mut events,
    );
    report(&events, args.verbose);

    let dt = Duration::from_millis(args.tick_ms);
    let mut simulated = Duration::ZERO;
    for _ in 0..args.ticks {
        // The systems see the previous batch first, so the configuration
        // events reach them before the opening frame.
        commands.clear();
        {
            let topology = query::topology(&world);
            let player = query::player(&world);
            let agents = query::agents(&world);
            let qubits = query::qubits(&world);
            steering.handle(&events, &topology, &player, &agents, &qubits, &mut commands);
            let path_cells = query::path_cells(&world);
            let active = query::power_ups(&world).active_count();
            spawning.handle(&events, &path_cells, active, &mut commands);
        }
        events.clear();
        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }

        let intent = autopilot_intent(&world);
        apply(
            &mut world,
            Command::SetPlayerIntent {
                x: intent.x,
                y: intent.y,
            },
            &mut events,
        );
        apply(&mut world, Command::Tick { dt }, &mut events);
        simulated += dt;
        report(&events, args.verbose);

        if query::is_defeated(&world) || query::is_cleared(&world) {
            break;
        }
    }

    let player = query::player(&world);
    let outcome = if query::is_cleared(&world) {
        "cleared"
    } else if query::is_defeated(&world) {
        "defeated"
    } else {
        "time limit reached"
    };
    println!(
        "{outcome} after {:.1}s: score {}, lives {}, qubits remaining {}",
        simulated.as_secs_f32(),
        query::score(&world),
        player.lives,
        query::remaining_qubits(&world),
    );
    Ok(())
}

/// Steers the player toward the nearest uncollected qubit.
fn autopilot_intent(world: &World) -> Vec2 {
    let player = query::player(world);
    let position = Vec2::new(player.position.x(), player.position.y());
    let mut nearest: Option<(Vec2, f32)> = None;
    for qubit in query::qubits(world).iter() {
        if qubit.collected {
            continue;
        }
        let separation = player.position.distance_to(qubit.position);
        let target = Vec2::new(qubit.position.x(), qubit.position.y());
        if nearest.map_or(true, |(_, best)| separation < best) {
            nearest = Some((target, separation));
        }
    }
    match nearest {
        Some((target, _)) => (target - position).normalize_or_zero(),
        None => Vec2::ZERO,
    }
}

fn report(events: &[Event], verbose: bool) {
    for event in events {
        match event {
            Event::SessionConfigured { columns, rows } => {
                println!("session configured: {columns}x{rows} cells");
            }
            Event::ModeChanged { phase } => println!("mode -> {phase:?}"),
            Event::FrightenedStarted { duration } => {
                println!("agents frightened for {:.1}s", duration.as_secs_f32());
            }
            Event::FrightenedEnded { phase } => println!("frightened over, back to {phase:?}"),
            Event::AgentCaptured {
                agent,
                by_entanglement,
            } => {
                if *by_entanglement {
                    println!("agent {} captured through entanglement", agent.get());
                } else {
                    println!("agent {} captured", agent.get());
                }
            }
            Event::PlayerHit { lives_remaining } => {
                println!("player hit, {lives_remaining} lives left");
            }
            Event::PlayerDefeated => println!("player defeated"),
            Event::PlayerTeleported { to, .. } => {
                println!("teleported to ({:.0}, {:.0})", to.x(), to.y());
            }
            Event::QubitCollected { qubit, points } => {
                println!("qubit {} collected (+{points})", qubit.get());
            }
            Event::EntanglementWindowOpened { partner, window } => {
                println!(
                    "entanglement window open: qubit {} within {:.1}s",
                    partner.get(),
                    window.as_secs_f32()
                );
            }
            Event::EntanglementBonus { points, .. } => {
                println!("entanglement bonus (+{points})");
            }
            Event::EntanglementWindowExpired => println!("entanglement window expired"),
            Event::PowerUpSpawned { cell, kind, .. } => {
                println!(
                    "{kind:?} power-up at ({}, {})",
                    cell.column(),
                    cell.row()
                );
            }
            Event::PowerUpCollected { kind, points } => {
                println!("{kind:?} collected (+{points})");
            }
            Event::LevelCleared => println!("level cleared"),
            Event::TimeAdvanced { .. } | Event::AgentPathNeeded { .. } | Event::AgentBlocked { .. } => {
                if verbose {
                    println!("{event:?}");
                }
            }
        }
    }
}
