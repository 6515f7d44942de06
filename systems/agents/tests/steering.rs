//! Steering behavior exercised against a live world.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use quantum_maze_core::{AgentId, AgentKind, Command, Config, Event};
use quantum_maze_system_agents::{Config as SteeringConfig, Steering};
use quantum_maze_world::{apply, query, World};

fn configured(seed: u64) -> (World, Vec<Event>) {
    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigureSession {
            columns: 40,
            rows: 30,
            config: Config::default(),
            seed,
        },
        &mut events,
    );
    (world, events)
}

fn pump(world: &World, steering: &mut Steering, events: &[Event]) -> Vec<Command> {
    let mut commands = Vec::new();
    let topology = query::topology(world);
    let player = query::player(world);
    let agents = query::agents(world);
    let qubits = query::qubits(world);
    steering.handle(events, &topology, &player, &agents, &qubits, &mut commands);
    commands
}

fn path_command_for(commands: &[Command], agent: AgentId) -> bool {
    commands
        .iter()
        .any(|command| matches!(command, Command::SetAgentPath { agent: id, .. } if *id == agent))
}

fn heading_command_for(commands: &[Command], agent: AgentId) -> bool {
    commands
        .iter()
        .any(|command| matches!(command, Command::SetAgentHeading { agent: id, .. } if *id == agent))
}

#[test]
fn initial_planning_covers_every_agent() {
    let (world, events) = configured(61);
    let mut steering = Steering::new(SteeringConfig::new(7));
    let commands = pump(&world, &mut steering, &events);

    for agent in query::agents(&world).iter() {
        let planned = commands.iter().any(|command| match command {
            Command::SetAgentPath { agent: id, .. } => *id == agent.id,
            Command::SetAgentHeading { agent: id, .. } => *id == agent.id,
            _ => false,
        });
        assert!(planned, "agent {} received no plan", agent.id.get());
        match agent.kind {
            AgentKind::Rover => assert!(
                !path_command_for(&commands, agent.id),
                "rovers travel by heading"
            ),
            _ => assert!(path_command_for(&commands, agent.id)),
        }
    }
}

#[test]
fn rover_headings_hold_until_the_turn_cadence() {
    // Agents stand still so wall contact never forces an extra turn.
    let mut config = Config::default();
    config.agent_speed = 0.0;
    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigureSession {
            columns: 40,
            rows: 30,
            config,
            seed: 43,
        },
        &mut events,
    );
    let mut steering = Steering::new(SteeringConfig::new(7));
    for command in pump(&world, &mut steering, &events) {
        let mut sink = Vec::new();
        apply(&mut world, command, &mut sink);
    }
    let rovers: Vec<AgentId> = query::agents(&world)
        .iter()
        .filter(|agent| agent.kind == AgentKind::Rover)
        .map(|agent| agent.id)
        .collect();
    assert!(!rovers.is_empty());

    // One second in, the path recompute cadence fires but the two second
    // turn timer has not; the standing heading survives.
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        &mut events,
    );
    let commands = pump(&world, &mut steering, &events);
    for rover in &rovers {
        assert!(
            !heading_command_for(&commands, *rover),
            "rover {} re-rolled its heading ahead of the turn cadence",
            rover.get()
        );
    }
    for command in commands {
        let mut sink = Vec::new();
        apply(&mut world, command, &mut sink);
    }

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(1500),
        },
        &mut events,
    );
    let commands = pump(&world, &mut steering, &events);
    for rover in &rovers {
        assert!(heading_command_for(&commands, *rover));
    }
}

#[test]
fn frightened_agents_all_receive_flee_paths() {
    let (mut world, events) = configured(67);
    let mut steering = Steering::new(SteeringConfig::new(7));
    for command in pump(&world, &mut steering, &events) {
        let mut sink = Vec::new();
        apply(&mut world, command, &mut sink);
    }

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ActivateFrightened {
            duration: Duration::from_secs(5),
        },
        &mut events,
    );
    let commands = pump(&world, &mut steering, &events);

    for agent in query::agents(&world).iter() {
        assert!(
            path_command_for(&commands, agent.id),
            "frightened agent {} should flee along a path",
            agent.id.get()
        );
    }
}

#[test]
fn cached_paths_are_reused_until_the_recompute_cadence() {
    let (mut world, events) = configured(71);
    let mut steering = Steering::new(SteeringConfig::new(7));
    for command in pump(&world, &mut steering, &events) {
        let mut sink = Vec::new();
        apply(&mut world, command, &mut sink);
    }
    let pursuer = AgentId::new(0);

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(500),
        },
        &mut events,
    );
    let commands = pump(&world, &mut steering, &events);
    assert!(
        !path_command_for(&commands, pursuer),
        "half a second in, the cached path still stands"
    );
    for command in commands {
        let mut sink = Vec::new();
        apply(&mut world, command, &mut sink);
    }

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(600),
        },
        &mut events,
    );
    let commands = pump(&world, &mut steering, &events);
    assert!(path_command_for(&commands, pursuer));
}

#[test]
fn replaying_identical_seeds_yields_identical_trajectories() {
    fn fingerprint(seed: u64) -> u64 {
        let (mut world, mut events) = configured(seed);
        let mut steering = Steering::new(SteeringConfig::new(seed ^ 0xABCD));
        let mut hasher = DefaultHasher::new();

        for frame in 0..600_u32 {
            let commands = pump(&world, &mut steering, &events);
            events.clear();
            for command in commands {
                apply(&mut world, command, &mut events);
            }
            apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_millis(16),
                },
                &mut events,
            );

            if frame % 60 == 0 {
                let player = query::player(&world);
                player.position.x().to_bits().hash(&mut hasher);
                player.position.y().to_bits().hash(&mut hasher);
                for agent in query::agents(&world).iter() {
                    agent.position.x().to_bits().hash(&mut hasher);
                    agent.position.y().to_bits().hash(&mut hasher);
                    agent.captured.hash(&mut hasher);
                }
                query::score(&world).hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    assert_eq!(fingerprint(83), fingerprint(83));
}
