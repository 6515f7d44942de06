#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Quantum Maze simulation.
//!
//! The world owns the maze, the player, the pursuit agents, the collectibles,
//! the power-ups, and the teleporter pair. All mutation flows through
//! [`apply`]; read access flows through the [`query`] module, which hands out
//! immutable snapshots defined in the core crate.

use std::{collections::VecDeque, time::Duration};

use glam::Vec2;
use quantum_maze_core::{
    AgentId, AgentKind, CellCoord, CellType, Command, Config, Direction, Event, ModePhase,
    PowerUpId, PowerUpKind, QubitId, TopologyView, WorldPos,
};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

mod collision;
mod maze;

use maze::Maze;

/// Speeds are tuned per frame at 60 Hz; displacement scales accordingly.
const FRAME_RATE_SCALE: f32 = 60.0;
const MOMENTUM_LERP: f32 = 0.3;
const MOMENTUM_DAMPING: f32 = 0.8;
const WAYPOINT_TOLERANCE: f32 = 5.0;

const QUBIT_RADIUS: f32 = 6.0;
const QUBIT_POINTS: u32 = 10;
const ENTANGLED_QUBIT_POINTS: u32 = 25;

const POWER_UP_RADIUS: f32 = 8.0;
const PORTAL_RADIUS: f32 = 15.0;
const GUARDIAN_PATROL_RADIUS: f32 = 80.0;

const ROVER_SPEED_SCALE: f32 = 0.8;
const GUARDIAN_SPEED_SCALE: f32 = 2.0 / 3.0;

/// Frightened window opened by collecting an entanglement power-up.
const ENTANGLEMENT_FRIGHT: Duration = Duration::from_secs(8);

struct Player {
    position: Vec2,
    momentum: Vec2,
    intent: Vec2,
    lives: u32,
    phase_bypass: f32,
    capture: f32,
    grace: f32,
}

struct Agent {
    id: AgentId,
    kind: AgentKind,
    position: Vec2,
    speed: f32,
    heading: Direction,
    path: VecDeque<Vec2>,
    frightened: bool,
    captured: bool,
    partner: Option<AgentId>,
    patrol: Option<(Vec2, f32)>,
}

struct Qubit {
    id: QubitId,
    position: Vec2,
    collected: bool,
    points: u32,
    partner: Option<QubitId>,
}

struct PowerUp {
    id: PowerUpId,
    kind: PowerUpKind,
    cell: CellCoord,
    position: Vec2,
    collected: bool,
}

struct Portals {
    cells: [CellCoord; 2],
    positions: [Vec2; 2],
    cooldown: f32,
}

struct ModeController {
    phase: ModePhase,
    timer: f32,
    frightened: f32,
}

struct EntanglementWindow {
    partner: QubitId,
    remaining: f32,
}

/// Authoritative simulation state.
pub struct World {
    config: Config,
    maze: Maze,
    rng: ChaCha8Rng,
    player: Player,
    agents: Vec<Agent>,
    qubits: Vec<Qubit>,
    power_ups: Vec<PowerUp>,
    next_power_up: u32,
    portals: Option<Portals>,
    mode: ModeController,
    entanglement: Option<EntanglementWindow>,
    score: u32,
    defeated: bool,
    cleared: bool,
}

impl World {
    /// Creates an empty world. Adapters are expected to submit
    /// [`Command::ConfigureSession`] before ticking.
    #[must_use]
    pub fn new() -> Self {
        let config = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let maze = Maze::generate(5, 5, config.cell_size, 0.0, &mut rng);
        let start = maze.cell_center(CellCoord::new(1, 1));
        let lives = config.lives;
        Self {
            config,
            maze,
            rng,
            player: Player {
                position: vec_from(start),
                momentum: Vec2::ZERO,
                intent: Vec2::ZERO,
                lives,
                phase_bypass: 0.0,
                capture: 0.0,
                grace: 0.0,
            },
            agents: Vec::new(),
            qubits: Vec::new(),
            power_ups: Vec::new(),
            next_power_up: 0,
            portals: None,
            mode: ModeController {
                phase: ModePhase::Chase,
                timer: 0.0,
                frightened: 0.0,
            },
            entanglement: None,
            score: 0,
            defeated: false,
            cleared: false,
        }
    }

    fn configure(
        &mut self,
        columns: u32,
        rows: u32,
        config: Config,
        seed: u64,
        events: &mut Vec<Event>,
    ) {
        self.config = config;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.maze = Maze::generate(
            columns,
            rows,
            self.config.cell_size,
            self.config.unstable_wall_chance,
            &mut self.rng,
        );

        let path_cells = self.maze.path_cells();
        let player_cell = path_cells
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(CellCoord::new(1, 1));
        let player_position = vec_from(self.maze.cell_center(player_cell));
        self.player = Player {
            position: player_position,
            momentum: Vec2::ZERO,
            intent: Vec2::ZERO,
            lives: self.config.lives,
            phase_bypass: 0.0,
            capture: 0.0,
            grace: 0.0,
        };

        let mut open: Vec<CellCoord> = path_cells
            .iter()
            .copied()
            .filter(|cell| *cell != player_cell)
            .collect();
        open.shuffle(&mut self.rng);

        let qubit_count = self.config.qubit_count.min(open.len());
        // The paired prefix must have even length even when truncated.
        let paired = (self.config.entangled_pairs * 2).min(qubit_count) & !1;
        self.qubits = (0..qubit_count)
            .map(|index| {
                let partner = if index < paired {
                    let other = if index % 2 == 0 { index + 1 } else { index - 1 };
                    Some(QubitId::new(other as u32))
                } else {
                    None
                };
                Qubit {
                    id: QubitId::new(index as u32),
                    position: vec_from(self.maze.cell_center(open[index])),
                    collected: false,
                    points: if partner.is_some() {
                        ENTANGLED_QUBIT_POINTS
                    } else {
                        QUBIT_POINTS
                    },
                    partner,
                }
            })
            .collect();

        let remaining = &open[qubit_count..];
        let far: Vec<CellCoord> = remaining
            .iter()
            .copied()
            .filter(|cell| {
                vec_from(self.maze.cell_center(*cell)).distance(player_position)
                    >= self.config.agent_spawn_distance
            })
            .collect();
        let pool = if far.len() >= self.config.agent_count {
            far
        } else {
            remaining.to_vec()
        };
        let agent_count = self.config.agent_count.min(pool.len());
        self.agents = (0..agent_count)
            .map(|index| {
                let kind = [AgentKind::Pursuer, AgentKind::Rover, AgentKind::Guardian][index % 3];
                let position = vec_from(self.maze.cell_center(pool[index]));
                let heading = Direction::ALL
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or(Direction::East);
                Agent {
                    id: AgentId::new(index as u32),
                    kind,
                    position,
                    speed: kind_speed(kind, self.config.agent_speed) * self.config.speed_multiplier,
                    heading,
                    path: VecDeque::new(),
                    frightened: false,
                    captured: false,
                    partner: None,
                    patrol: if kind == AgentKind::Guardian {
                        Some((position, GUARDIAN_PATROL_RADIUS))
                    } else {
                        None
                    },
                }
            })
            .collect();
        let mut pair_index = 0;
        while pair_index + 1 < self.agents.len() {
            let (left, right) = (self.agents[pair_index].id, self.agents[pair_index + 1].id);
            self.agents[pair_index].partner = Some(right);
            self.agents[pair_index + 1].partner = Some(left);
            pair_index += 2;
        }

        self.portals = farthest_pair(&path_cells, &self.maze).map(|(first, second)| Portals {
            cells: [first, second],
            positions: [
                vec_from(self.maze.cell_center(first)),
                vec_from(self.maze.cell_center(second)),
            ],
            cooldown: 0.0,
        });

        self.power_ups.clear();
        self.next_power_up = 0;
        self.mode = ModeController {
            phase: ModePhase::Chase,
            timer: 0.0,
            frightened: 0.0,
        };
        self.entanglement = None;
        self.score = 0;
        self.defeated = false;
        self.cleared = false;

        events.push(Event::SessionConfigured {
            columns: self.maze.columns(),
            rows: self.maze.rows(),
        });
        for agent in &self.agents {
            events.push(Event::AgentPathNeeded { agent: agent.id });
        }
    }

    fn tick(&mut self, dt: Duration, events: &mut Vec<Event>) {
        events.push(Event::TimeAdvanced { dt });
        if self.defeated || self.cleared {
            return;
        }
        let dt = dt.as_secs_f32();

        self.maze.update(dt);
        self.advance_mode(dt, events);
        self.advance_player(dt);
        self.advance_agents(dt, events);
        self.advance_portals(dt, events);
        self.advance_entanglement_window(dt, events);
        self.collect_qubits(events);
        self.collect_power_ups(events);
        self.resolve_contacts(events);
    }

    fn advance_mode(&mut self, dt: f32, events: &mut Vec<Event>) {
        if self.mode.frightened > 0.0 {
            self.mode.frightened -= dt;
            if self.mode.frightened <= 0.0 {
                self.mode.frightened = 0.0;
                for agent in &mut self.agents {
                    agent.frightened = false;
                }
                events.push(Event::FrightenedEnded {
                    phase: self.mode.phase,
                });
            }
        }
        self.mode.timer += dt;
        let interval = self.config.mode_interval.as_secs_f32();
        if interval > 0.0 && self.mode.timer >= interval {
            self.mode.timer -= interval;
            self.mode.phase = self.mode.phase.toggled();
            events.push(Event::ModeChanged {
                phase: self.mode.phase,
            });
        }
    }

    fn advance_player(&mut self, dt: f32) {
        let speed = self.config.player_speed;
        let player = &mut self.player;
        player.momentum += (player.intent - player.momentum) * MOMENTUM_LERP;
        let displacement = player.momentum * speed * dt * FRAME_RATE_SCALE;
        let bypass = player.phase_bypass > 0.0;
        let outcome = collision::resolve(&self.maze, player.position, displacement, bypass);
        player.position = outcome.position;
        if outcome.blocked {
            player.momentum *= MOMENTUM_DAMPING;
        }
        player.phase_bypass = (player.phase_bypass - dt).max(0.0);
        player.capture = (player.capture - dt).max(0.0);
        player.grace = (player.grace - dt).max(0.0);
    }

    fn advance_agents(&mut self, dt: f32, events: &mut Vec<Event>) {
        for index in 0..self.agents.len() {
            if self.agents[index].captured {
                continue;
            }
            loop {
                let Some(&waypoint) = self.agents[index].path.front() else {
                    break;
                };
                if self.agents[index].position.distance(waypoint) <= WAYPOINT_TOLERANCE {
                    let _ = self.agents[index].path.pop_front();
                } else {
                    break;
                }
            }

            let agent = &self.agents[index];
            let direction = if let Some(&waypoint) = agent.path.front() {
                let delta = waypoint - agent.position;
                if delta.length_squared() > 0.0 {
                    delta.normalize()
                } else {
                    Vec2::ZERO
                }
            } else if agent.kind == AgentKind::Rover {
                direction_vec(agent.heading)
            } else {
                Vec2::ZERO
            };
            if direction == Vec2::ZERO {
                continue;
            }

            let displacement = direction * agent.speed * dt * FRAME_RATE_SCALE;
            let outcome = collision::resolve(&self.maze, agent.position, displacement, false);
            self.agents[index].position = outcome.position;
            if outcome.blocked {
                events.push(Event::AgentBlocked {
                    agent: self.agents[index].id,
                });
            }
        }
    }

    fn advance_portals(&mut self, dt: f32, events: &mut Vec<Event>) {
        let Some(portals) = &mut self.portals else {
            return;
        };
        portals.cooldown = (portals.cooldown - dt).max(0.0);
        if portals.cooldown > 0.0 {
            return;
        }
        for end in 0..2 {
            if self.player.position.distance(portals.positions[end]) <= PORTAL_RADIUS {
                let from = self.player.position;
                let to = portals.positions[1 - end];
                self.player.position = to;
                portals.cooldown = self.config.teleport_cooldown.as_secs_f32();
                events.push(Event::PlayerTeleported {
                    from: world_pos(from),
                    to: world_pos(to),
                });
                break;
            }
        }
    }

    fn advance_entanglement_window(&mut self, dt: f32, events: &mut Vec<Event>) {
        if let Some(window) = &mut self.entanglement {
            window.remaining -= dt;
            if window.remaining <= 0.0 {
                self.entanglement = None;
                events.push(Event::EntanglementWindowExpired);
            }
        }
    }

    fn collect_qubits(&mut self, events: &mut Vec<Event>) {
        let reach = self.config.player_radius + QUBIT_RADIUS;
        for index in 0..self.qubits.len() {
            if self.qubits[index].collected {
                continue;
            }
            if self.player.position.distance(self.qubits[index].position) > reach {
                continue;
            }
            self.qubits[index].collected = true;
            let id = self.qubits[index].id;
            let points = self.qubits[index].points;
            let partner = self.qubits[index].partner;
            self.score += points;
            events.push(Event::QubitCollected { qubit: id, points });

            let Some(partner) = partner else {
                continue;
            };
            if self.entanglement.as_ref().is_some_and(|window| window.partner == id) {
                self.entanglement = None;
                self.score += self.config.entanglement_bonus;
                events.push(Event::EntanglementBonus {
                    qubit: id,
                    points: self.config.entanglement_bonus,
                });
            } else {
                let partner_open = self
                    .qubits
                    .iter()
                    .any(|qubit| qubit.id == partner && !qubit.collected);
                if partner_open && self.entanglement.is_none() {
                    self.entanglement = Some(EntanglementWindow {
                        partner,
                        remaining: self.config.entanglement_window.as_secs_f32(),
                    });
                    events.push(Event::EntanglementWindowOpened {
                        partner,
                        window: self.config.entanglement_window,
                    });
                }
            }
        }
        if !self.cleared && !self.qubits.is_empty() && self.qubits.iter().all(|qubit| qubit.collected)
        {
            self.cleared = true;
            events.push(Event::LevelCleared);
        }
    }

    fn collect_power_ups(&mut self, events: &mut Vec<Event>) {
        let reach = self.config.player_radius + POWER_UP_RADIUS;
        for index in 0..self.power_ups.len() {
            if self.power_ups[index].collected {
                continue;
            }
            if self.player.position.distance(self.power_ups[index].position) > reach {
                continue;
            }
            self.power_ups[index].collected = true;
            let kind = self.power_ups[index].kind;
            let points = kind.points();
            self.score += points;
            events.push(Event::PowerUpCollected { kind, points });
            match kind {
                PowerUpKind::Superposition => {
                    self.player.phase_bypass = kind.duration().as_secs_f32();
                }
                PowerUpKind::Measurement => {
                    self.player.capture = kind.duration().as_secs_f32();
                    self.frighten(self.config.frightened_duration, events);
                }
                PowerUpKind::Entanglement => {
                    self.frighten(ENTANGLEMENT_FRIGHT, events);
                }
            }
        }
    }

    fn frighten(&mut self, duration: Duration, events: &mut Vec<Event>) {
        let seconds = duration.as_secs_f32();
        if seconds <= 0.0 {
            return;
        }
        self.mode.frightened = seconds;
        // Rewinding the toggle timer grants a grace stretch of the current phase.
        self.mode.timer -= seconds;
        for agent in &mut self.agents {
            if !agent.captured {
                agent.frightened = true;
            }
        }
        events.push(Event::FrightenedStarted { duration });
    }

    fn resolve_contacts(&mut self, events: &mut Vec<Event>) {
        let reach = self.config.player_radius + self.config.agent_radius;
        for index in 0..self.agents.len() {
            if self.agents[index].captured {
                continue;
            }
            if self.player.position.distance(self.agents[index].position) > reach {
                continue;
            }
            if self.agents[index].frightened || self.player.capture > 0.0 {
                self.capture_agent(index, false, events);
            } else if self.player.grace <= 0.0 {
                self.lose_life(events);
                break;
            }
        }
    }

    fn capture_agent(&mut self, index: usize, by_entanglement: bool, events: &mut Vec<Event>) {
        self.agents[index].captured = true;
        self.agents[index].frightened = false;
        self.agents[index].path.clear();
        events.push(Event::AgentCaptured {
            agent: self.agents[index].id,
            by_entanglement,
        });
        if by_entanglement {
            // Entanglement propagates one link deep.
            return;
        }
        let Some(partner) = self.agents[index].partner else {
            return;
        };
        if let Some(partner_index) = self.agents.iter().position(|agent| agent.id == partner) {
            if !self.agents[partner_index].captured {
                self.capture_agent(partner_index, true, events);
            }
        }
    }

    fn lose_life(&mut self, events: &mut Vec<Event>) {
        self.player.lives = self.player.lives.saturating_sub(1);
        events.push(Event::PlayerHit {
            lives_remaining: self.player.lives,
        });
        if self.player.lives == 0 {
            self.defeated = true;
            events.push(Event::PlayerDefeated);
            return;
        }
        if let Some(position) = self.maze.random_path_position(&mut self.rng) {
            self.player.position = vec_from(position);
        }
        self.player.momentum = Vec2::ZERO;
        self.player.grace = self.config.hit_grace.as_secs_f32();
    }

    fn set_player_intent(&mut self, x: f32, y: f32) {
        let sanitize = |value: f32| {
            if value.is_finite() {
                value.clamp(-1.0, 1.0)
            } else {
                0.0
            }
        };
        self.player.intent = Vec2::new(sanitize(x), sanitize(y));
    }

    fn set_agent_path(&mut self, agent: AgentId, waypoints: Vec<WorldPos>) {
        if let Some(entry) = self.agents.iter_mut().find(|entry| entry.id == agent) {
            if entry.captured {
                return;
            }
            entry.path = waypoints.into_iter().map(vec_from).collect();
        }
    }

    fn set_agent_heading(&mut self, agent: AgentId, direction: Direction) {
        if let Some(entry) = self.agents.iter_mut().find(|entry| entry.id == agent) {
            if entry.captured {
                return;
            }
            entry.heading = direction;
            entry.path.clear();
        }
    }

    fn spawn_power_up(&mut self, cell: CellCoord, kind: PowerUpKind, events: &mut Vec<Event>) {
        let topology = TopologyView::new(
            self.maze.cells(),
            self.maze.columns(),
            self.maze.rows(),
            self.maze.cell_size(),
        );
        if topology.cell_type(cell) != Some(CellType::Path) {
            return;
        }
        let active = self
            .power_ups
            .iter()
            .filter(|power_up| !power_up.collected)
            .count();
        if active >= self.config.max_powerups {
            return;
        }
        if self
            .power_ups
            .iter()
            .any(|power_up| !power_up.collected && power_up.cell == cell)
        {
            return;
        }
        let id = PowerUpId::new(self.next_power_up);
        self.next_power_up += 1;
        self.power_ups.push(PowerUp {
            id,
            kind,
            cell,
            position: vec_from(self.maze.cell_center(cell)),
            collected: false,
        });
        events.push(Event::PowerUpSpawned { id, cell, kind });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes a command against the world, appending resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSession {
            columns,
            rows,
            config,
            seed,
        } => world.configure(columns, rows, config, seed, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetPlayerIntent { x, y } => world.set_player_intent(x, y),
        Command::SetAgentPath { agent, waypoints } => world.set_agent_path(agent, waypoints),
        Command::SetAgentHeading { agent, direction } => world.set_agent_heading(agent, direction),
        Command::SpawnPowerUp { cell, kind } => world.spawn_power_up(cell, kind, out_events),
        Command::ActivateFrightened { duration } => world.frighten(duration, out_events),
    }
}

fn farthest_pair(cells: &[CellCoord], maze: &Maze) -> Option<(CellCoord, CellCoord)> {
    let mut best: Option<(CellCoord, CellCoord, f32)> = None;
    for i in 0..cells.len() {
        for j in (i + 1)..cells.len() {
            let a = vec_from(maze.cell_center(cells[i]));
            let b = vec_from(maze.cell_center(cells[j]));
            let separation = a.distance_squared(b);
            if best.map_or(true, |(_, _, current)| separation > current) {
                best = Some((cells[i], cells[j], separation));
            }
        }
    }
    best.map(|(first, second, _)| (first, second))
}

fn kind_speed(kind: AgentKind, base: f32) -> f32 {
    match kind {
        AgentKind::Pursuer => base,
        AgentKind::Rover => base * ROVER_SPEED_SCALE,
        AgentKind::Guardian => base * GUARDIAN_SPEED_SCALE,
    }
}

fn direction_vec(direction: Direction) -> Vec2 {
    let (delta_column, delta_row) = direction.offset();
    Vec2::new(delta_column as f32, delta_row as f32)
}

fn world_pos(value: Vec2) -> WorldPos {
    WorldPos::new(value.x, value.y)
}

fn vec_from(value: WorldPos) -> Vec2 {
    Vec2::new(value.x(), value.y())
}

/// Read-only access into the world state.
pub mod query {
    use quantum_maze_core::{
        AgentMode, AgentSnapshot, AgentView, CellCoord, ModePhase, ModeSnapshot, Patrol,
        PlayerSnapshot, PortalSnapshot, PowerUpSnapshot, PowerUpView, QubitSnapshot, QubitView,
        TopologyView, WorldPos,
    };
    use std::time::Duration;

    use super::{world_pos, World};

    /// View into the carved maze topology.
    #[must_use]
    pub fn topology(world: &World) -> TopologyView<'_> {
        TopologyView::new(
            world.maze.cells(),
            world.maze.columns(),
            world.maze.rows(),
            world.maze.cell_size(),
        )
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let position = world_pos(world.player.position);
        PlayerSnapshot {
            position,
            cell: topology(world).clamped_cell_at(position),
            lives: world.player.lives,
            has_phase_bypass: world.player.phase_bypass > 0.0,
            has_capture: world.player.capture > 0.0,
        }
    }

    /// Snapshot view over every agent, ordered by identifier.
    #[must_use]
    pub fn agents(world: &World) -> AgentView {
        let view = topology(world);
        AgentView::from_snapshots(
            world
                .agents
                .iter()
                .map(|agent| {
                    let position = world_pos(agent.position);
                    AgentSnapshot {
                        id: agent.id,
                        kind: agent.kind,
                        mode: if agent.frightened {
                            AgentMode::Frightened
                        } else {
                            match world.mode.phase {
                                ModePhase::Chase => AgentMode::Chase,
                                ModePhase::Scatter => AgentMode::Scatter,
                            }
                        },
                        position,
                        cell: view.clamped_cell_at(position),
                        heading: agent.heading,
                        path_len: agent.path.len(),
                        captured: agent.captured,
                        patrol: agent.patrol.map(|(center, radius)| Patrol {
                            center: world_pos(center),
                            radius,
                        }),
                    }
                })
                .collect(),
        )
    }

    /// Snapshot view over every qubit, ordered by identifier.
    #[must_use]
    pub fn qubits(world: &World) -> QubitView {
        let view = topology(world);
        QubitView::from_snapshots(
            world
                .qubits
                .iter()
                .map(|qubit| {
                    let position = world_pos(qubit.position);
                    QubitSnapshot {
                        id: qubit.id,
                        position,
                        cell: view.clamped_cell_at(position),
                        collected: qubit.collected,
                        points: qubit.points,
                        partner: qubit.partner,
                    }
                })
                .collect(),
        )
    }

    /// Snapshot view over every power-up, ordered by identifier.
    #[must_use]
    pub fn power_ups(world: &World) -> PowerUpView {
        PowerUpView::from_snapshots(
            world
                .power_ups
                .iter()
                .map(|power_up| PowerUpSnapshot {
                    id: power_up.id,
                    kind: power_up.kind,
                    position: world_pos(power_up.position),
                    cell: power_up.cell,
                    collected: power_up.collected,
                })
                .collect(),
        )
    }

    /// Snapshots of both teleporter ends, or empty when the maze has none.
    #[must_use]
    pub fn portals(world: &World) -> Vec<PortalSnapshot> {
        let Some(portals) = &world.portals else {
            return Vec::new();
        };
        let cooldown = Duration::from_secs_f32(portals.cooldown.max(0.0));
        (0..2)
            .map(|end| PortalSnapshot {
                position: world_pos(portals.positions[end]),
                cell: portals.cells[end],
                cooldown_remaining: cooldown,
            })
            .collect()
    }

    /// Snapshot of the global mode controller.
    #[must_use]
    pub fn mode(world: &World) -> ModeSnapshot {
        ModeSnapshot {
            phase: world.mode.phase,
            frightened: world.mode.frightened > 0.0,
        }
    }

    /// Session score accumulated so far.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Number of qubits still uncollected.
    #[must_use]
    pub fn remaining_qubits(world: &World) -> usize {
        world
            .qubits
            .iter()
            .filter(|qubit| !qubit.collected)
            .count()
    }

    /// Reports whether the player has run out of lives.
    #[must_use]
    pub fn is_defeated(world: &World) -> bool {
        world.defeated
    }

    /// Reports whether every qubit has been collected.
    #[must_use]
    pub fn is_cleared(world: &World) -> bool {
        world.cleared
    }

    /// Every permanently open cell, in row-major order.
    #[must_use]
    pub fn path_cells(world: &World) -> Vec<CellCoord> {
        world.maze.path_cells()
    }

    /// Uniformly random center of a permanently open cell, drawn from the
    /// caller's generator so replays stay reproducible.
    #[must_use]
    pub fn random_path_position<R: rand::Rng>(world: &World, rng: &mut R) -> Option<WorldPos> {
        world.maze.random_path_position(rng)
    }

    /// Probes momentary solidity at a world-space position.
    #[must_use]
    pub fn is_wall_at(world: &World, position: WorldPos, bypass: bool) -> bool {
        world.maze.is_wall_at(position.x(), position.y(), bypass)
    }
}

/// Hooks that let tests stage situations without scripting full movement.
#[cfg(any(test, feature = "tests_scaffolding"))]
pub mod scaffolding {
    use quantum_maze_core::{AgentId, WorldPos};

    use super::{vec_from, World};

    /// Moves the player to an exact position and zeroes its momentum.
    pub fn place_player(world: &mut World, position: WorldPos) {
        world.player.position = vec_from(position);
        world.player.momentum = glam::Vec2::ZERO;
    }

    /// Moves an agent to an exact position and clears its path.
    pub fn place_agent(world: &mut World, agent: AgentId, position: WorldPos) {
        if let Some(entry) = world.agents.iter_mut().find(|entry| entry.id == agent) {
            entry.position = vec_from(position);
            entry.path.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, World};
    use quantum_maze_core::{CellCoord, CellType, Command, Config, Event, PowerUpKind};
    use std::time::Duration;

    fn configured(seed: u64, config: Config) -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureSession {
                columns: 21,
                rows: 15,
                config,
                seed,
            },
            &mut events,
        );
        (world, events)
    }

    #[test]
    fn configure_populates_the_session() {
        let config = Config::default();
        let (world, events) = configured(9, config.clone());

        assert!(matches!(
            events.first(),
            Some(Event::SessionConfigured { columns: 21, rows: 15 })
        ));
        let path_needed = events
            .iter()
            .filter(|event| matches!(event, Event::AgentPathNeeded { .. }))
            .count();
        assert_eq!(path_needed, query::agents(&world).iter().count());
        assert_eq!(query::qubits(&world).iter().count(), config.qubit_count);
        assert_eq!(query::portals(&world).len(), 2);
        assert_eq!(query::score(&world), 0);
    }

    #[test]
    fn entangled_prefix_is_paired_symmetrically() {
        let (world, _) = configured(11, Config::default());
        let qubits = query::qubits(&world).into_vec();
        let entangled: Vec<_> = qubits.iter().filter(|q| q.partner.is_some()).collect();
        assert_eq!(entangled.len(), Config::default().entangled_pairs * 2);
        for qubit in &entangled {
            let partner = qubit.partner.expect("entangled qubit has a partner");
            let other = qubits
                .iter()
                .find(|candidate| candidate.id == partner)
                .expect("partner exists");
            assert_eq!(other.partner, Some(qubit.id));
            assert_eq!(qubit.points, 25);
        }
    }

    #[test]
    fn random_path_positions_are_open_and_reproducible() {
        use rand::SeedableRng;
        let (world, _) = configured(15, Config::default());
        let mut first = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        let mut second = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        for _ in 0..8 {
            let position = query::random_path_position(&world, &mut first)
                .expect("a carved maze has open cells");
            let cell = query::topology(&world).clamped_cell_at(position);
            assert_eq!(query::topology(&world).cell_type(cell), Some(CellType::Path));
            assert_eq!(query::random_path_position(&world, &mut second), Some(position));
        }
    }

    #[test]
    fn player_intent_is_clamped() {
        let (mut world, _) = configured(3, Config::default());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPlayerIntent { x: 5.0, y: f32::NAN },
            &mut events,
        );
        assert_eq!(world.player.intent.x, 1.0);
        assert_eq!(world.player.intent.y, 0.0);
    }

    #[test]
    fn power_up_spawns_respect_cell_type_and_cap() {
        let mut config = Config::default();
        config.max_powerups = 1;
        let (mut world, _) = configured(5, config);
        let mut events = Vec::new();

        let path_cells = query::path_cells(&world);
        let wall_cell = (0..world.maze.columns())
            .flat_map(|column| (0..world.maze.rows()).map(move |row| CellCoord::new(column, row)))
            .find(|cell| query::topology(&world).cell_type(*cell) == Some(CellType::Wall))
            .expect("maze has walls");

        apply(
            &mut world,
            Command::SpawnPowerUp {
                cell: wall_cell,
                kind: PowerUpKind::Measurement,
            },
            &mut events,
        );
        assert!(events.is_empty());

        apply(
            &mut world,
            Command::SpawnPowerUp {
                cell: path_cells[0],
                kind: PowerUpKind::Superposition,
            },
            &mut events,
        );
        assert_eq!(events.len(), 1);

        apply(
            &mut world,
            Command::SpawnPowerUp {
                cell: path_cells[1],
                kind: PowerUpKind::Entanglement,
            },
            &mut events,
        );
        assert_eq!(events.len(), 1, "cap of one rejects the second spawn");
    }

    #[test]
    fn frightened_rewinds_the_mode_timer() {
        let mut config = Config::default();
        config.agent_count = 0;
        let (mut world, _) = configured(7, config);
        let mut events = Vec::new();
        for _ in 0..9 {
            apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_secs(1),
                },
                &mut events,
            );
        }
        assert!(!events.iter().any(|e| matches!(e, Event::ModeChanged { .. })));

        apply(
            &mut world,
            Command::ActivateFrightened {
                duration: Duration::from_secs(5),
            },
            &mut events,
        );
        events.clear();

        // The rewound timer keeps the next two seconds toggle-free.
        for _ in 0..2 {
            apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_secs(1),
                },
                &mut events,
            );
        }
        assert!(!events.iter().any(|e| matches!(e, Event::ModeChanged { .. })));
    }
}
